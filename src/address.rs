//! # Chain Addresses
//!
//! A 20-byte account identifier, the universal currency of reference in this
//! crate: assets, depositors, vaults, and the factory itself are all just
//! addresses. The accounting core never interprets an address — it only
//! compares, hashes, and forwards them to the bank collaborator.
//!
//! Addresses render as `0x`-prefixed lowercase hex, 40 characters, the way
//! every chain explorer on the planet prints them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte chain address.
///
/// Used for basket assets, share holders, deployed vaults, and the factory.
/// Equality and ordering are plain byte comparison; there is no checksum
/// validation here — the core treats addresses as opaque identifiers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address. Useful as a sentinel in tests and for
    /// burn-style accounting; the core itself never treats it specially.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Creates an `Address` from raw bytes. `const` so tests and embedders
    /// can declare well-known addresses as constants.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 20-byte identifier.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the `0x`-prefixed lowercase hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parses a hex address, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)?;
        if bytes.len() != 20 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}...)", &self.to_hex()[..10])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// Serde helper: serialize HashMap<Address, V> with hex-string keys
// ---------------------------------------------------------------------------

/// Serde helper module for serializing/deserializing `HashMap<Address, V>`
/// as a JSON object with hex-encoded string keys.
///
/// JSON requires map keys to be strings, but `Address` wraps `[u8; 20]`
/// which serde would serialize as an array. This module converts keys
/// to/from their hex representation so the map serializes correctly.
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct MyStruct {
///     #[serde(with = "crate::address::address_map")]
///     shares: HashMap<Address, u128>,
/// }
/// ```
pub mod address_map {
    use super::Address;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    pub fn serialize<V, S>(map: &HashMap<Address, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut ser_map = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in map {
            ser_map.serialize_entry(&key.to_hex(), value)?;
        }
        ser_map.end()
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<HashMap<Address, V>, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let string_map: HashMap<String, V> = HashMap::deserialize(deserializer)?;
        string_map
            .into_iter()
            .map(|(key, value)| {
                Address::from_hex(&key)
                    .map(|addr| (addr, value))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let addr = Address::from_bytes([0xAB; 20]);
        let hex_str = addr.to_hex();
        assert!(hex_str.starts_with("0x"));
        assert_eq!(hex_str.len(), 42);
        assert_eq!(Address::from_hex(&hex_str).unwrap(), addr);
    }

    #[test]
    fn parses_without_prefix() {
        let addr = Address::from_bytes([0x01; 20]);
        let bare = hex::encode(addr.as_bytes());
        assert_eq!(Address::from_hex(&bare).unwrap(), addr);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Address::from_hex("0xdeadbeef").is_err());
        assert!(Address::from_hex("").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        let junk = "0x".to_string() + &"zz".repeat(20);
        assert!(Address::from_hex(&junk).is_err());
    }

    #[test]
    fn display_matches_to_hex() {
        let addr = Address::from_bytes([0x5A; 20]);
        assert_eq!(format!("{}", addr), addr.to_hex());
    }

    #[test]
    fn address_map_serde_roundtrip() {
        use serde::{Deserialize, Serialize};
        use std::collections::HashMap;

        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Holder {
            #[serde(with = "crate::address::address_map")]
            shares: HashMap<Address, u128>,
        }

        let mut shares = HashMap::new();
        shares.insert(Address::from_bytes([0x11; 20]), 42u128);
        shares.insert(Address::from_bytes([0x22; 20]), 7u128);
        let holder = Holder { shares };

        let json = serde_json::to_string(&holder).expect("serialize");
        let recovered: Holder = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(holder, recovered);
    }
}
