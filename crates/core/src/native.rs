//! Host built-in item kinds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tool::ToolSpec;

/// Default stack limit for native kinds that don't specify one.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// A host built-in item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeKind {
    /// Canonical lowercase name without namespace (e.g. "stone").
    pub name: String,
    /// Native durability, for damageable host types.
    pub max_durability: Option<u32>,
    /// Maximum stack size.
    pub max_stack: u32,
    /// Tool class and tier, if this kind is a tool.
    pub tool: Option<ToolSpec>,
}

impl NativeKind {
    /// Plain stackable kind.
    pub fn simple(name: &str) -> Self {
        Self {
            name: normalize_native_name(name),
            max_durability: None,
            max_stack: DEFAULT_MAX_STACK,
            tool: None,
        }
    }

    /// Non-stacking tool kind with native durability.
    pub fn tool(name: &str, tool: ToolSpec, max_durability: u32) -> Self {
        Self {
            name: normalize_native_name(name),
            max_durability: Some(max_durability),
            max_stack: 1,
            tool: Some(tool),
        }
    }
}

/// Lookup into the host's built-in item catalog.
pub trait NativeCatalog {
    /// Resolve a native kind by name. Names may carry a namespace
    /// (`minecraft:stone`); case is ignored unless `case_sensitive`.
    fn kind(&self, name: &str, case_sensitive: bool) -> Option<&NativeKind>;
}

/// Strip any namespace and case-fold a native name.
pub fn normalize_native_name(name: &str) -> String {
    let name = name.trim();
    let path = name.split_once(':').map_or(name, |(_, path)| path);
    path.to_lowercase()
}

/// In-memory native catalog keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct NativeRegistry {
    kinds: Vec<NativeKind>,
    name_to_index: HashMap<String, usize>,
}

impl NativeRegistry {
    /// Construct a registry from the supplied kinds. Later duplicates are ignored.
    pub fn new(kinds: Vec<NativeKind>) -> Self {
        let mut registry = Self::default();
        for kind in kinds {
            registry.insert(kind);
        }
        registry
    }

    /// Insert a kind. Returns false if the name was already present.
    pub fn insert(&mut self, mut kind: NativeKind) -> bool {
        kind.name = normalize_native_name(&kind.name);
        if self.name_to_index.contains_key(&kind.name) {
            return false;
        }
        self.name_to_index.insert(kind.name.clone(), self.kinds.len());
        self.kinds.push(kind);
        true
    }

    /// Look up a kind by name, ignoring namespace and case.
    pub fn get(&self, name: &str) -> Option<&NativeKind> {
        self.name_to_index
            .get(&normalize_native_name(name))
            .and_then(|&index| self.kinds.get(index))
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NativeKind> {
        self.kinds.iter()
    }

    /// Number of kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true when the catalog holds no kinds.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl NativeCatalog for NativeRegistry {
    fn kind(&self, name: &str, case_sensitive: bool) -> Option<&NativeKind> {
        let kind = self.get(name)?;
        if case_sensitive {
            let path = name.trim();
            let path = path.split_once(':').map_or(path, |(_, path)| path);
            if path != kind.name {
                return None;
            }
        }
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{ToolMaterial, ToolType};

    fn registry() -> NativeRegistry {
        NativeRegistry::new(vec![
            NativeKind::simple("air"),
            NativeKind::simple("minecraft:stone"),
            NativeKind::tool(
                "iron_pickaxe",
                ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Iron),
                250,
            ),
        ])
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_native_name("minecraft:Stone"), "stone");
        assert_eq!(normalize_native_name(" dirt "), "dirt");
    }

    #[test]
    fn lookup_ignores_namespace_and_case() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("STONE").map(|k| k.name.as_str()), Some("stone"));
        assert!(registry.kind("minecraft:stone", false).is_some());
        assert!(registry.kind("Stone", false).is_some());
        assert!(registry.kind("Stone", true).is_none());
        assert!(registry.kind("stone", true).is_some());
        assert!(registry.kind("granite", false).is_none());
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut registry = registry();
        assert!(!registry.insert(NativeKind::simple("STONE")));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn tool_kinds_do_not_stack() {
        let registry = registry();
        let pick = registry.get("iron_pickaxe").unwrap();
        assert_eq!(pick.max_stack, 1);
        assert_eq!(pick.max_durability, Some(250));
        assert_eq!(pick.tool.map(|t| t.material), Some(ToolMaterial::Iron));
    }
}
