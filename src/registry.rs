//! # Vault Registry — the Factory
//!
//! The registry owns the global create-once semantics: it derives each
//! candidate vault's content-addressed identity, rejects a configuration
//! that already exists, and deploys the ledger at its deterministic
//! address. One registry per process (or per simulated chain), constructed
//! explicitly — no global state hiding anywhere.
//!
//! Because identity is order-sensitive, `[A, B] / [1, 2]` and
//! `[B, A] / [2, 1]` are different vaults and both may exist. That is the
//! original factory's behavior, preserved deliberately: canonicalizing the
//! order here would orphan every vault already deployed with the other
//! ordering.

use std::collections::HashMap;

use tracing::info;

use crate::address::Address;
use crate::bank::AssetBank;
use crate::basket::VaultConfig;
use crate::error::VaultError;
use crate::identity::{vault_address, VaultId};
use crate::ledger::VaultLedger;

/// The factory: creates, deduplicates, and looks up vaults.
///
/// Vaults are kept in creation order (the original factory's `allVaults`
/// array) and indexed by both identity and address. There is no deletion —
/// once created, a vault exists for the life of the registry.
#[derive(Debug)]
pub struct VaultRegistry {
    address: Address,
    order: Vec<VaultId>,
    vaults: HashMap<VaultId, VaultLedger>,
    by_address: HashMap<Address, VaultId>,
}

impl VaultRegistry {
    /// Creates an empty registry at the given factory address. The address
    /// scopes every derived vault address, so two registries at different
    /// addresses never collide.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            order: Vec::new(),
            vaults: HashMap::new(),
            by_address: HashMap::new(),
        }
    }

    /// The factory's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Predicts the address a configuration would deploy at, without
    /// creating anything. Pure: callable before or after creation, always
    /// the same answer.
    pub fn predict_address(&self, config: &VaultConfig) -> Address {
        vault_address(self.address, VaultId::derive(config))
    }

    /// Creates a vault for `config`, rejecting duplicates.
    ///
    /// The bank is consulted only for asset symbols (share-token naming).
    /// On success the new ledger is returned; its id and address are
    /// readable from it.
    ///
    /// # Errors
    ///
    /// [`VaultError::DuplicateVault`] if a vault with an identical
    /// configuration (same asset order, same weights, same tracking token)
    /// already exists.
    pub fn create_vault<B: AssetBank>(
        &mut self,
        config: VaultConfig,
        bank: &B,
    ) -> Result<&VaultLedger, VaultError> {
        let id = VaultId::derive(&config);
        if self.vaults.contains_key(&id) {
            return Err(VaultError::DuplicateVault(id));
        }

        let address = vault_address(self.address, id);
        let ledger = VaultLedger::new(&config, id, address, bank);

        info!(vault = %address, %id, assets = config.asset_len(), "vault created");

        self.order.push(id);
        self.by_address.insert(address, id);
        self.vaults.insert(id, ledger);
        Ok(&self.vaults[&id])
    }

    /// Number of vaults ever created.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` if no vault has been created yet.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Looks a vault up by identity.
    pub fn get(&self, id: &VaultId) -> Option<&VaultLedger> {
        self.vaults.get(id)
    }

    /// Looks a vault up by its deployed address.
    pub fn get_by_address(&self, address: &Address) -> Option<&VaultLedger> {
        self.by_address.get(address).and_then(|id| self.vaults.get(id))
    }

    /// Mutable access to a vault by address, for deposit/withdraw calls.
    ///
    /// # Errors
    ///
    /// [`VaultError::UnknownVault`] if no vault lives at `address`.
    pub fn vault_mut(&mut self, address: &Address) -> Result<&mut VaultLedger, VaultError> {
        let id = self
            .by_address
            .get(address)
            .ok_or(VaultError::UnknownVault(*address))?;
        Ok(self
            .vaults
            .get_mut(id)
            .expect("by_address and vaults are kept in sync"))
    }

    /// Vault identities in creation order.
    pub fn vault_ids(&self) -> impl Iterator<Item = &VaultId> {
        self.order.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
