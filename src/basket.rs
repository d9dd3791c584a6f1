//! # Basket Configuration
//!
//! A [`VaultConfig`] is the immutable recipe for a vault: which assets it
//! holds, in what fixed weight ratios, and which tracking token it is
//! associated with. The only way to obtain one is [`VaultConfig::new`],
//! which validates everything up front — so every `VaultConfig` in
//! existence is well-formed and the rest of the crate never re-checks.
//!
//! Assets and weights are positionally paired and stored as a single
//! sequence of pairs, not parallel vectors, so the equal-length invariant
//! holds by construction. Weights are taken exactly as given: `[4, 15]` is
//! NOT reduced to anything — the weight vector is part of the vault's
//! identity and of its minimum deposit unit.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::config::MIN_BASKET_ASSETS;
use crate::error::VaultError;

/// A validated, immutable vault configuration.
///
/// Invariants enforced at construction:
/// - at least [`MIN_BASKET_ASSETS`] assets,
/// - exactly one weight per asset,
/// - every weight non-zero,
/// - all assets pairwise distinct.
///
/// The tracking token participates in identity derivation only; it may
/// coincide with a basket asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    slots: Vec<(Address, u128)>,
    tracking_token: Address,
}

impl VaultConfig {
    /// Builds a configuration from positionally paired asset and weight
    /// sequences, validating all basket invariants.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InsufficientAssets`] if fewer than two assets.
    /// - [`VaultError::LengthMismatch`] if the sequences differ in length.
    /// - [`VaultError::ZeroWeight`] if any weight is zero.
    /// - [`VaultError::DuplicateAsset`] if an asset repeats.
    pub fn new(
        assets: Vec<Address>,
        weights: Vec<u128>,
        tracking_token: Address,
    ) -> Result<Self, VaultError> {
        if assets.len() < MIN_BASKET_ASSETS {
            return Err(VaultError::InsufficientAssets { got: assets.len() });
        }
        if assets.len() != weights.len() {
            return Err(VaultError::LengthMismatch {
                assets: assets.len(),
                weights: weights.len(),
            });
        }
        for (i, asset) in assets.iter().enumerate() {
            if weights[i] == 0 {
                return Err(VaultError::ZeroWeight(*asset));
            }
            if assets[..i].contains(asset) {
                return Err(VaultError::DuplicateAsset(*asset));
            }
        }

        Ok(Self {
            slots: assets.into_iter().zip(weights).collect(),
            tracking_token,
        })
    }

    /// Number of assets in the basket.
    pub fn asset_len(&self) -> usize {
        self.slots.len()
    }

    /// The asset at slot `i`, if any.
    pub fn asset(&self, i: usize) -> Option<Address> {
        self.slots.get(i).map(|(asset, _)| *asset)
    }

    /// The weight at slot `i`, if any.
    pub fn weight(&self, i: usize) -> Option<u128> {
        self.slots.get(i).map(|(_, weight)| *weight)
    }

    /// The ordered (asset, weight) pairs.
    pub fn slots(&self) -> &[(Address, u128)] {
        &self.slots
    }

    /// The tracking token.
    pub fn tracking_token(&self) -> Address {
        self.tracking_token
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
