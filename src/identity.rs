//! # Vault Identity
//!
//! A vault's identity is a content-addressed BLAKE3 hash of its canonical
//! configuration: the ordered asset list, the ordered weight list, and the
//! tracking token. Same triple, same id, on every machine, forever — which
//! is exactly what the factory needs to deduplicate vaults and to predict a
//! vault's address before it exists.
//!
//! ## Canonical encoding
//!
//! The preimage is fixed-width, so no separators are needed and no two
//! distinct configurations can encode to the same bytes:
//!
//! ```text
//! version (1 byte) || asset count (u32 LE)
//!     || asset[0..n] (20 bytes each)
//!     || weight[0..n] (u128 LE each)
//!     || tracking token (20 bytes)
//! ```
//!
//! Identity is order-sensitive by construction: permuting the assets (even
//! with correspondingly permuted weights), changing a single weight, or
//! swapping the tracking token all produce a different id. The original
//! environment derived identity from deterministic deployment addresses;
//! this versioned hash replaces that mechanism with something any host can
//! compute.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Address;
use crate::basket::VaultConfig;
use crate::config::{IDENTITY_ENCODING_VERSION, VAULT_ADDRESS_TAG};

/// A unique, content-addressed identifier for a vault configuration.
///
/// Two configurations produce the same `VaultId` if and only if their
/// ordered (assets, weights, tracking token) triples are identical. The
/// factory uses this as its deduplication key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultId([u8; 32]);

impl VaultId {
    /// Creates a `VaultId` from a raw 32-byte hash.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 32-byte identifier.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the hex-encoded vault id.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a hex-encoded vault id.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Derives the `VaultId` for a validated configuration.
    ///
    /// Pure function, no state. See the module docs for the canonical
    /// encoding; the version byte makes the scheme upgradable without
    /// cross-version collisions.
    pub fn derive(config: &VaultConfig) -> Self {
        let n = config.asset_len();
        let mut preimage = Vec::with_capacity(1 + 4 + n * 20 + n * 16 + 20);
        preimage.push(IDENTITY_ENCODING_VERSION);
        preimage.extend_from_slice(&(n as u32).to_le_bytes());
        for (asset, _) in config.slots() {
            preimage.extend_from_slice(asset.as_bytes());
        }
        for (_, weight) in config.slots() {
            preimage.extend_from_slice(&weight.to_le_bytes());
        }
        preimage.extend_from_slice(config.tracking_token().as_bytes());

        Self(*blake3::hash(&preimage).as_bytes())
    }
}

impl fmt::Debug for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VaultId({}...)", &self.to_hex()[..12])
    }
}

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for VaultId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// Address derivation
// ---------------------------------------------------------------------------

/// Computes the deterministic address a factory deploys a vault at.
///
/// `BLAKE3(tag || factory || vault_id)`, truncated to 20 bytes. The
/// domain-separation tag keeps vault addresses out of every other hash
/// namespace, and including the factory address means two independent
/// factories can host the same configuration without colliding.
pub fn vault_address(factory: Address, id: VaultId) -> Address {
    let mut preimage = Vec::with_capacity(1 + 20 + 32);
    preimage.push(VAULT_ADDRESS_TAG);
    preimage.extend_from_slice(factory.as_bytes());
    preimage.extend_from_slice(id.as_bytes());

    let digest = blake3::hash(&preimage);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest.as_bytes()[..20]);
    Address::from_bytes(addr)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
