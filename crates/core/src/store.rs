//! Item definition store.
//!
//! Definitions are kept in insertion order and indexed by their case-folded
//! id. Case-sensitive lookup goes through the same index and then requires
//! an exact match on the registered id.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::definition::{DefinitionConfig, ItemDefinition};
use crate::key::{fold, ids_match};

/// Outcome of [`DefinitionStore::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterStatus {
    /// Registered and valid.
    Success,
    /// An item with the same id (ignoring case) already exists; nothing changed.
    AlreadyRegistered,
    /// Validation failed. The definition is recorded for diagnostics (unless
    /// the id is blank) but never served by validity-requiring lookups.
    Invalid,
}

/// Opaque reference to a registered definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemHandle {
    index: usize,
    folded_id: String,
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// What happened.
    pub status: RegisterStatus,
    /// Handle to the recorded definition (the existing one for duplicates).
    pub handle: Option<ItemHandle>,
}

/// All known custom item definitions.
#[derive(Debug, Clone, Default)]
pub struct DefinitionStore {
    definitions: Vec<Arc<ItemDefinition>>,
    by_folded_id: HashMap<String, usize>,
}

impl DefinitionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a definition.
    pub fn register(&mut self, config: DefinitionConfig) -> Registration {
        let folded_id = fold(&config.id);
        if folded_id.is_empty() {
            warn!(name = %config.name, "Refusing to register custom item with a blank id");
            return Registration {
                status: RegisterStatus::Invalid,
                handle: None,
            };
        }

        if let Some(&index) = self.by_folded_id.get(&folded_id) {
            debug!(id = %config.id, "Custom item already registered");
            return Registration {
                status: RegisterStatus::AlreadyRegistered,
                handle: Some(ItemHandle { index, folded_id }),
            };
        }

        let definition = ItemDefinition::from_config(config);
        let status = if definition.is_valid() {
            debug!(id = definition.id(), "Registered custom item");
            RegisterStatus::Success
        } else {
            for problem in definition.problems() {
                warn!(id = definition.id(), "Invalid custom item: {problem}");
            }
            RegisterStatus::Invalid
        };

        let index = self.definitions.len();
        self.definitions.push(Arc::new(definition));
        self.by_folded_id.insert(folded_id.clone(), index);

        Registration {
            status,
            handle: Some(ItemHandle { index, folded_id }),
        }
    }

    /// Resolve a handle issued by this store.
    pub fn get(&self, handle: &ItemHandle) -> Option<&Arc<ItemDefinition>> {
        self.definitions
            .get(handle.index)
            .filter(|def| fold(def.id()) == handle.folded_id)
    }

    /// Look up a definition by id, valid or not.
    pub fn lookup(&self, id: &str, case_sensitive: bool) -> Option<&Arc<ItemDefinition>> {
        let index = *self.by_folded_id.get(&fold(id))?;
        let definition = self.definitions.get(index)?;
        if case_sensitive && !ids_match(definition.id(), id.trim(), true) {
            return None;
        }
        Some(definition)
    }

    /// Look up a definition by id, skipping invalid ones.
    pub fn lookup_valid(&self, id: &str, case_sensitive: bool) -> Option<&Arc<ItemDefinition>> {
        self.lookup(id, case_sensitive).filter(|def| def.is_valid())
    }

    /// Every recorded definition, in insertion order.
    pub fn list_all(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.definitions.iter()
    }

    /// Placement-eligible definitions, in insertion order.
    pub fn list_placeable(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.definitions.iter().filter(|def| def.is_placeable())
    }

    /// Ids of every valid definition, in insertion order.
    pub fn list_all_ids(&self) -> Vec<String> {
        self.list_all()
            .filter(|def| def.is_valid())
            .map(|def| def.id().to_string())
            .collect()
    }

    /// Ids of every valid placeable definition, in insertion order.
    pub fn list_placeable_ids(&self) -> Vec<String> {
        self.list_placeable()
            .filter(|def| def.is_valid())
            .map(|def| def.id().to_string())
            .collect()
    }

    /// Number of recorded definitions (including invalid ones).
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// A store that can be swapped wholesale at runtime.
///
/// Readers take an `Arc` snapshot and keep using it for the whole operation,
/// so a concurrent [`SharedStore::replace`] is seen either fully or not at all.
#[derive(Debug, Default)]
pub struct SharedStore {
    current: RwLock<Arc<DefinitionStore>>,
}

impl SharedStore {
    /// Publish an initial store.
    pub fn new(store: DefinitionStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// The currently published store.
    pub fn snapshot(&self) -> Arc<DefinitionStore> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publish a new store, returning the previous one.
    pub fn replace(&self, store: DefinitionStore) -> Arc<DefinitionStore> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        debug!(definitions = store.len(), "Swapping definition store");
        std::mem::replace(&mut *current, Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword() -> DefinitionConfig {
        DefinitionConfig::new("Sword_Of_Fire", "Sword of Fire", "golden_sword")
    }

    #[test]
    fn test_register_and_lookup() {
        let mut store = DefinitionStore::new();
        let reg = store.register(sword());
        assert_eq!(reg.status, RegisterStatus::Success);

        let handle = reg.handle.expect("handle issued");
        assert_eq!(store.get(&handle).unwrap().id(), "Sword_Of_Fire");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut store = DefinitionStore::new();
        let first = store.register(sword());
        let second = store.register(DefinitionConfig::new("sword_of_fire", "Other", "stick"));

        assert_eq!(second.status, RegisterStatus::AlreadyRegistered);
        assert_eq!(second.handle, first.handle);
        // First definition is untouched
        assert_eq!(store.lookup("sword_of_fire", false).unwrap().name(), "Sword of Fire");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut store = DefinitionStore::new();
        store.register(sword());

        let a = store.lookup("Sword_Of_Fire", false).map(|d| d.id());
        let b = store.lookup("sword_of_fire", false).map(|d| d.id());
        assert_eq!(a, b);
        assert!(a.is_some());

        assert!(store.lookup("Sword_Of_Fire", true).is_some());
        assert!(store.lookup("sword_of_fire", true).is_none());
        assert!(store.lookup("missing", false).is_none());
    }

    #[test]
    fn test_invalid_definitions_are_recorded_but_filtered() {
        let mut store = DefinitionStore::new();
        let reg = store.register(DefinitionConfig::new("ghost", "Ghost", " "));
        assert_eq!(reg.status, RegisterStatus::Invalid);
        assert!(reg.handle.is_some());

        assert!(store.lookup("ghost", false).is_some());
        assert!(store.lookup_valid("ghost", false).is_none());
        assert!(store.list_all_ids().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_blank_id_is_not_recorded() {
        let mut store = DefinitionStore::new();
        let reg = store.register(DefinitionConfig::new("  ", "Nothing", "stone"));
        assert_eq!(reg.status, RegisterStatus::Invalid);
        assert!(reg.handle.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_listing_keeps_insertion_order() {
        let mut store = DefinitionStore::new();
        store.register(DefinitionConfig::new("zeta", "Zeta", "stone"));
        store.register(DefinitionConfig {
            placeable: true,
            block_material: Some("stone".into()),
            ..DefinitionConfig::new("alpha", "Alpha", "stone")
        });
        store.register(DefinitionConfig::new("mid", "Mid", "stone"));

        assert_eq!(store.list_all_ids(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(store.list_placeable_ids(), vec!["alpha"]);
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let mut a = DefinitionStore::new();
        let mut b = DefinitionStore::new();
        let handle = a.register(sword()).handle.unwrap();
        b.register(DefinitionConfig::new("other", "Other", "stone"));
        assert!(b.get(&handle).is_none());
    }

    #[test]
    fn test_shared_store_swaps_whole_snapshot() {
        let mut old = DefinitionStore::new();
        old.register(sword());
        let shared = SharedStore::new(old);

        let before = shared.snapshot();
        let mut new = DefinitionStore::new();
        new.register(DefinitionConfig::new("ruby", "Ruby", "emerald"));
        let previous = shared.replace(new);

        // In-flight readers keep the old set
        assert!(before.lookup("sword_of_fire", false).is_some());
        assert!(Arc::ptr_eq(&before, &previous));

        let after = shared.snapshot();
        assert!(after.lookup("sword_of_fire", false).is_none());
        assert!(after.lookup("ruby", false).is_some());
    }
}
