// Copyright (c) 2026 PGVault Contributors. MIT License.
// See LICENSE for details.

//! # PGVault — Weighted-Basket Vault Accounting Core
//!
//! A deterministic, integer-only ledger for pooled multi-asset vaults. A
//! vault holds a fixed basket of assets in fixed weight ratios and issues a
//! proportional share token: depositors supply the whole basket at once,
//! withdrawers get the whole basket back. No price oracles, no rebalancing,
//! no floating point — just exact integer arithmetic that an off-chain
//! engine can replay bit-for-bit against on-chain state.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of the
//! accounting core:
//!
//! - **address** — 20-byte chain addresses for assets, holders, and vaults.
//! - **identity** — Content-addressed vault identity and deterministic
//!   address prediction. Same basket, same id, every time.
//! - **basket** — Validated vault configuration: ordered (asset, weight)
//!   pairs plus a tracking token. Invalid baskets never exist.
//! - **ledger** — The vault ledger itself: reserves, share supply, and the
//!   deposit/withdraw arithmetic with its deliberate rounding bias.
//! - **bank** — The asset-transfer collaborator boundary, plus an in-memory
//!   implementation for simulation and tests.
//! - **registry** — The factory: creates vaults, deduplicates identical
//!   configurations, predicts addresses before creation.
//! - **error** — One exhaustive error taxonomy. Nothing is swallowed.
//! - **config** — Protocol constants. Magic numbers live here, nowhere else.
//!
//! ## Design Philosophy
//!
//! 1. Check, then commit. Every operation validates everything before it
//!    mutates anything — a failure leaves no partial state behind.
//! 2. Rounding always favors the vault: deposits are whole basket units,
//!    withdrawals floor. This asymmetry is an anti-dilution guarantee, not
//!    a bug.
//! 3. `u128` everywhere value appears. 18-decimal assets overflow `u64`
//!    faster than you'd like to believe.
//! 4. If it touches money, it has tests. Plural.

pub mod address;
pub mod bank;
pub mod basket;
pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod registry;

pub use address::Address;
pub use bank::{AssetBank, InMemoryBank};
pub use basket::VaultConfig;
pub use error::VaultError;
pub use identity::{vault_address, VaultId};
pub use ledger::{AssetSlot, DepositReceipt, VaultLedger, WithdrawReceipt};
pub use registry::VaultRegistry;
