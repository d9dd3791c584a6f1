//! # Asset Bank — the Transfer Collaborator
//!
//! The ledger never holds tokens itself; it instructs an external
//! collaborator to move them. [`AssetBank`] is that boundary: exact-integer,
//! synchronous, atomic settlement — a transfer either fully happens or
//! fully fails before the ledger commits anything.
//!
//! [`InMemoryBank`] is the reference implementation for simulation and
//! tests. It also exposes [`InMemoryBank::set_balance`], which models the
//! one thing a well-behaved bank never does: an asset unilaterally changing
//! a holder's balance out from under the ledger (a "slashing" asset). That
//! is exactly the corruption the withdrawal path must detect.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::address::Address;
use crate::error::VaultError;

/// The asset-transfer collaborator the ledger settles through.
///
/// Implementations must settle exactly and synchronously: after a
/// successful `transfer`, `balance_of` reflects the move; after a failed
/// one, nothing changed. The ledger pre-checks balances before transferring,
/// so with a law-abiding bank the `transfer` calls it issues cannot fail —
/// but the `Result` stays, because the whole point of the corrupted-reserve
/// handling is that banks are not always law-abiding.
pub trait AssetBank {
    /// Returns `holder`'s balance of `asset`.
    fn balance_of(&self, asset: Address, holder: Address) -> u128;

    /// Moves `amount` of `asset` from `from` to `to`, atomically.
    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), VaultError>;

    /// The asset's ticker symbol, if known. Used only for share-token
    /// naming; accounting never depends on it.
    fn symbol(&self, asset: Address) -> Option<String>;
}

// ---------------------------------------------------------------------------
// InMemoryBank
// ---------------------------------------------------------------------------

/// Display metadata for a registered asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMeta {
    /// Ticker symbol (e.g. "WBTC").
    pub symbol: String,
    /// Display decimal places. The bank never divides — this is metadata.
    pub decimals: u8,
}

/// A HashMap-backed [`AssetBank`] for simulation and tests.
///
/// Balances are keyed by `(asset, holder)`. Assets do not need to be
/// registered before use; registration only attaches symbol metadata.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InMemoryBank {
    balances: HashMap<(Address, Address), u128>,
    #[serde(with = "crate::address::address_map")]
    metadata: HashMap<Address, AssetMeta>,
}

impl InMemoryBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches symbol metadata to an asset.
    pub fn register(&mut self, asset: Address, symbol: &str, decimals: u8) {
        self.metadata.insert(
            asset,
            AssetMeta {
                symbol: symbol.to_string(),
                decimals,
            },
        );
    }

    /// Credits `amount` of `asset` to `holder` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if the balance would exceed
    /// `u128::MAX`.
    pub fn mint(
        &mut self,
        asset: Address,
        holder: Address,
        amount: u128,
    ) -> Result<u128, VaultError> {
        let balance = self.balances.entry((asset, holder)).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(VaultError::Overflow)?;
        Ok(*balance)
    }

    /// Overwrites `holder`'s balance of `asset`, bypassing transfer rules.
    ///
    /// This models external corruption — an asset contract slashing a
    /// vault's holdings, an airdrop, an admin intervention. Ledger reserves
    /// are NOT updated; that divergence is the scenario the withdrawal
    /// path's holdings check exists for.
    pub fn set_balance(&mut self, asset: Address, holder: Address, amount: u128) {
        self.balances.insert((asset, holder), amount);
    }
}

impl AssetBank for InMemoryBank {
    fn balance_of(&self, asset: Address, holder: Address) -> u128 {
        self.balances.get(&(asset, holder)).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), VaultError> {
        let available = self.balance_of(asset, from);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                asset,
                available,
                required: amount,
            });
        }
        let credited = self
            .balance_of(asset, to)
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;

        self.balances.insert((asset, from), available - amount);
        self.balances.insert((asset, to), credited);
        Ok(())
    }

    fn symbol(&self, asset: Address) -> Option<String> {
        self.metadata.get(&asset).map(|m| m.symbol.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::from_bytes([tag; 20])
    }

    #[test]
    fn mint_accumulates() {
        let mut bank = InMemoryBank::new();
        bank.mint(addr(1), addr(0xA0), 100).unwrap();
        bank.mint(addr(1), addr(0xA0), 50).unwrap();
        assert_eq!(bank.balance_of(addr(1), addr(0xA0)), 150);
    }

    #[test]
    fn unknown_balances_are_zero() {
        let bank = InMemoryBank::new();
        assert_eq!(bank.balance_of(addr(1), addr(0xA0)), 0);
    }

    #[test]
    fn transfer_moves_exact_amounts() {
        let mut bank = InMemoryBank::new();
        bank.mint(addr(1), addr(0xA0), 100).unwrap();

        bank.transfer(addr(1), addr(0xA0), addr(0xB0), 60).unwrap();
        assert_eq!(bank.balance_of(addr(1), addr(0xA0)), 40);
        assert_eq!(bank.balance_of(addr(1), addr(0xB0)), 60);
    }

    #[test]
    fn transfer_fails_without_funds_and_changes_nothing() {
        let mut bank = InMemoryBank::new();
        bank.mint(addr(1), addr(0xA0), 10).unwrap();

        let result = bank.transfer(addr(1), addr(0xA0), addr(0xB0), 11);
        assert!(matches!(
            result,
            Err(VaultError::InsufficientBalance {
                available: 10,
                required: 11,
                ..
            })
        ));
        assert_eq!(bank.balance_of(addr(1), addr(0xA0)), 10);
        assert_eq!(bank.balance_of(addr(1), addr(0xB0)), 0);
    }

    #[test]
    fn balances_are_per_asset() {
        let mut bank = InMemoryBank::new();
        bank.mint(addr(1), addr(0xA0), 100).unwrap();
        bank.mint(addr(2), addr(0xA0), 7).unwrap();

        assert_eq!(bank.balance_of(addr(1), addr(0xA0)), 100);
        assert_eq!(bank.balance_of(addr(2), addr(0xA0)), 7);
    }

    #[test]
    fn set_balance_bypasses_transfer_rules() {
        let mut bank = InMemoryBank::new();
        bank.mint(addr(1), addr(0xA0), 100).unwrap();

        // A slashing asset wipes the holding without any transfer.
        bank.set_balance(addr(1), addr(0xA0), 0);
        assert_eq!(bank.balance_of(addr(1), addr(0xA0)), 0);
    }

    #[test]
    fn symbol_lookup() {
        let mut bank = InMemoryBank::new();
        bank.register(addr(1), "WBTC", 8);

        assert_eq!(bank.symbol(addr(1)), Some("WBTC".to_string()));
        assert_eq!(bank.symbol(addr(2)), None);
    }

    #[test]
    fn mint_overflow_rejected() {
        let mut bank = InMemoryBank::new();
        bank.mint(addr(1), addr(0xA0), u128::MAX).unwrap();
        assert!(matches!(
            bank.mint(addr(1), addr(0xA0), 1),
            Err(VaultError::Overflow)
        ));
    }
}
