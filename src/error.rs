//! # Error Taxonomy
//!
//! Every failure mode of the accounting core, in one exhaustive enum. The
//! propagation policy is check-then-commit: an error means the operation
//! aborted before any state mutation, so callers never see partial writes
//! and the core needs no rollback machinery.
//!
//! Nothing here is retried or swallowed internally. In particular,
//! [`VaultError::InsufficientToken`] — the corrupted-reserve case — is
//! terminal by design: the core offers no self-healing path when a vault's
//! actual holdings fall short of its recorded reserves. Recovery is an
//! out-of-band administrative problem, not an accounting one.

use thiserror::Error;

use crate::address::Address;
use crate::identity::VaultId;

/// Errors that can occur during vault configuration, creation, and
/// ledger operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A basket needs at least two assets; anything less is a wrapper
    /// token, not a vault.
    #[error("at least 2 tokens are needed (got {got})")]
    InsufficientAssets {
        /// Number of assets that were supplied.
        got: usize,
    },

    /// Asset and weight sequences are positionally paired and must have
    /// equal length.
    #[error("assets and weights are not matching: {assets} assets, {weights} weights")]
    LengthMismatch {
        /// Length of the asset sequence.
        assets: usize,
        /// Length of the weight sequence.
        weights: usize,
    },

    /// The same asset appeared twice in a basket.
    #[error("repeating token not supported: {0}")]
    DuplicateAsset(Address),

    /// A basket weight of zero would make the proportional arithmetic
    /// divide by zero (slot 0) or demand nothing of an asset forever.
    #[error("weight for asset {0} must be non-zero")]
    ZeroWeight(Address),

    /// A vault with an identical configuration already exists in the
    /// registry. Identity is order-sensitive, so a permuted basket is a
    /// different vault.
    #[error("vault already exists for this configuration: {0}")]
    DuplicateVault(VaultId),

    /// The registry has no vault at the given address.
    #[error("unknown vault: {0}")]
    UnknownVault(Address),

    /// The depositor cannot cover the required proportional amount of one
    /// of the basket assets. The whole deposit aborts; no asset is pulled.
    #[error(
        "insufficient balance: {available} of {asset} available, deposit requires {required}"
    )]
    InsufficientBalance {
        /// The asset the depositor is short on.
        asset: Address,
        /// The depositor's actual bank balance.
        available: u128,
        /// The ceiling-rounded amount the basket requires.
        required: u128,
    },

    /// A holder tried to burn more shares than they own.
    #[error("insufficient shares: {available} held, {requested} requested")]
    InsufficientShares {
        /// The holder's share balance.
        available: u128,
        /// The amount requested.
        requested: u128,
    },

    /// The vault's actual holdings of an asset are smaller than what its
    /// recorded reserves say it should pay out — the corrupted-reserve
    /// case (e.g. a slashing asset unilaterally reduced the vault's
    /// balance). The withdrawal aborts and the holder's shares are kept
    /// intact; there is deliberately no alternative payout path.
    #[error("insufficient token to transfer: vault holds {actual} of {asset}, payout needs {required}")]
    InsufficientToken {
        /// The asset the vault is short on.
        asset: Address,
        /// The vault's actual bank balance.
        actual: u128,
        /// The floor-rounded payout the shares entitle to.
        required: u128,
    },

    /// Zero-amount deposits, withdrawals, and share transfers are no-ops
    /// and almost certainly caller bugs, so they are rejected outright.
    #[error("zero-amount operations are not permitted")]
    ZeroAmount,

    /// Arithmetic overflow in vault accounting. With `u128` amounts this
    /// takes deliberately absurd inputs, but the core refuses to wrap or
    /// saturate silently.
    #[error("arithmetic overflow in vault accounting")]
    Overflow,
}
