//! # Protocol Constants
//!
//! Every magic number in the accounting core lives here. These values are
//! part of the deterministic surface: changing any of them changes vault
//! identities or share-token metadata, which breaks replay against existing
//! on-chain state. Treat them as frozen.

/// Version byte prefixed to the canonical identity encoding.
///
/// Bump this only if the encoding itself changes — every existing vault id
/// becomes unreachable under a new version, which is the point: no silent
/// cross-version collisions.
pub const IDENTITY_ENCODING_VERSION: u8 = 0x01;

/// Domain-separation tag for vault address derivation.
///
/// Prefixed to `factory || vault_id` before hashing, so a vault address can
/// never collide with a hash computed for any other purpose. Mirrors the
/// deterministic-deployment convention of the original execution
/// environment.
pub const VAULT_ADDRESS_TAG: u8 = 0xF5;

/// Minimum number of assets in a basket. A one-asset "basket" is just a
/// wrapper token, which this core does not model.
pub const MIN_BASKET_ASSETS: usize = 2;

/// Ticker symbol carried by every vault's share token.
pub const SHARE_TOKEN_SYMBOL: &str = "PGV";

/// Prefix for the human-readable share-token name. The full name is
/// `"PGVault: {SYM0}-{SYM1}"` built from the basket assets' symbols.
pub const SHARE_TOKEN_NAME_PREFIX: &str = "PGVault";
