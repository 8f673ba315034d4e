use std::fs;
use std::path::Path;

use customitems_core::{
    Behavior, BlockDrop, DefinitionConfig, DefinitionStore, HideOptions, NativeKind,
    NativeRegistry, RegisterStatus, ToolMaterial, ToolRequirement, ToolSpec, ToolType,
    DEFAULT_MAX_STACK,
};
use tracing::{debug, info, instrument, warn};

use crate::{AssetError, ItemDefinitionFile, NativeDefinition, RequiredToolFile, ToolFile};

/// Counts from [`register_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Registered and valid.
    pub registered: usize,
    /// Ids skipped because they were already present.
    pub duplicates: Vec<String>,
    /// Ids recorded as invalid.
    pub invalid: Vec<String>,
}

impl LoadReport {
    /// True when every entry registered cleanly.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.invalid.is_empty()
    }
}

/// Load custom item definitions from a JSON pack on disk.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn definitions_from_file(path: &Path) -> Result<Vec<DefinitionConfig>, AssetError> {
    let data = fs::read_to_string(path)?;
    definitions_from_str(&data)
}

/// Load custom item definitions from an in-memory JSON string.
pub fn definitions_from_str(input: &str) -> Result<Vec<DefinitionConfig>, AssetError> {
    let files: Vec<ItemDefinitionFile> = serde_json::from_str(input)?;
    files.into_iter().map(definition_config).collect()
}

/// Load a native catalog from a JSON pack on disk.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn natives_from_file(path: &Path) -> Result<NativeRegistry, AssetError> {
    let data = fs::read_to_string(path)?;
    natives_from_str(&data)
}

/// Load a native catalog from an in-memory JSON string.
pub fn natives_from_str(input: &str) -> Result<NativeRegistry, AssetError> {
    let defs: Vec<NativeDefinition> = serde_json::from_str(input)?;
    let mut registry = NativeRegistry::default();
    for def in defs {
        let tool = def
            .tool
            .as_ref()
            .map(|tool| tool_spec(&def.name, tool))
            .transpose()?;
        let kind = NativeKind {
            max_stack: def
                .max_stack
                .unwrap_or(if tool.is_some() { 1 } else { DEFAULT_MAX_STACK }),
            max_durability: def.max_durability,
            tool,
            name: def.name,
        };
        let name = kind.name.clone();
        if !registry.insert(kind) {
            warn!(name = %name, "Duplicate native item kind ignored");
        }
    }
    debug!(kinds = registry.len(), "Loaded native catalog");
    Ok(registry)
}

/// Register every config into `store`, in order.
#[instrument(skip_all, fields(count = configs.len()))]
pub fn register_all(store: &mut DefinitionStore, configs: Vec<DefinitionConfig>) -> LoadReport {
    let mut report = LoadReport::default();
    for config in configs {
        let id = config.id.clone();
        match store.register(config).status {
            RegisterStatus::Success => report.registered += 1,
            RegisterStatus::AlreadyRegistered => {
                warn!(id = %id, "Skipping duplicate custom item");
                report.duplicates.push(id);
            }
            RegisterStatus::Invalid => report.invalid.push(id),
        }
    }
    info!(
        registered = report.registered,
        duplicates = report.duplicates.len(),
        invalid = report.invalid.len(),
        "Registered custom items"
    );
    report
}

fn definition_config(file: ItemDefinitionFile) -> Result<DefinitionConfig, AssetError> {
    let tool = file
        .tool
        .as_ref()
        .map(|tool| tool_spec(&file.id, tool))
        .transpose()?;
    let required_tool = file
        .required_tool
        .as_ref()
        .map(|req| tool_requirement(&file.id, req))
        .transpose()?;

    let mut hide = HideOptions::empty();
    hide.set(HideOptions::DURABILITY, file.hide_durability);
    hide.set(HideOptions::DURABILITY_BAR, file.hide_durability_bar);
    hide.set(HideOptions::FLAGS, file.hide_flags);
    hide.set(HideOptions::ATTRIBUTES, file.hide_attributes);
    hide.set(HideOptions::ENCHANTMENTS, file.hide_enchantments);

    let mut behavior = Behavior::empty();
    behavior.set(Behavior::ENCHANTABLE, file.enchantable);
    behavior.set(Behavior::THROWABLE, file.throwable);
    behavior.set(Behavior::CONSUMABLE, file.consumable);
    behavior.set(Behavior::PROJECTABLE, file.projectable);
    behavior.set(Behavior::GENERIC_USE, file.generic_use);
    behavior.set(Behavior::SILK_TOUCH_DROPS, file.silk_touch_drops);
    behavior.set(Behavior::FORTUNE_DROPS, file.fortune_drops);
    behavior.set(Behavior::GLOWS, file.glows);

    Ok(DefinitionConfig {
        version: file.version,
        texture_id: file.texture_id,
        block_texture_id: file.block_texture_id,
        category: file.category,
        force_update: file.force_update,
        damageable: file.damageable,
        max_durability: file.max_durability,
        initial_damage: file.initial_damage,
        hide,
        behavior,
        placeable: file.placeable,
        block_material: file.block_material,
        block_physics: file.block_physics,
        block_light_level: file.block_light_level,
        tool,
        required_tool,
        block_drops: file
            .drops
            .into_iter()
            .map(|drop| BlockDrop {
                item: drop.item,
                amount: drop.amount,
            })
            .collect(),
        ..DefinitionConfig::new(file.id, file.name, file.material)
    })
}

fn tool_kind(item: &str, value: &str) -> Result<ToolType, AssetError> {
    ToolType::parse(value).ok_or_else(|| AssetError::UnknownToolKind {
        item: item.to_string(),
        value: value.to_string(),
    })
}

fn tool_material(item: &str, value: &str) -> Result<ToolMaterial, AssetError> {
    ToolMaterial::parse(value).ok_or_else(|| AssetError::UnknownToolMaterial {
        item: item.to_string(),
        value: value.to_string(),
    })
}

fn tool_spec(item: &str, tool: &ToolFile) -> Result<ToolSpec, AssetError> {
    Ok(ToolSpec::new(
        tool_kind(item, &tool.kind)?,
        tool_material(item, &tool.material)?,
    ))
}

fn tool_requirement(item: &str, req: &RequiredToolFile) -> Result<ToolRequirement, AssetError> {
    Ok(ToolRequirement {
        kind: req
            .kind
            .as_deref()
            .map(|kind| tool_kind(item, kind))
            .transpose()?,
        min_tier: tool_material(item, &req.min_tier)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use customitems_core::NativeCatalog;

    const PACK: &str = r#"
[
  {
    "id": "ruby_pick",
    "name": "Ruby Pickaxe",
    "material": "diamond_pickaxe",
    "damageable": true,
    "max_durability": 100,
    "enchantable": true,
    "hide_durability_bar": true,
    "tool": { "kind": "pickaxe", "material": "diamond" }
  },
  {
    "id": "ruby_ore",
    "name": "Ruby Ore",
    "material": "emerald_ore",
    "version": 3,
    "placeable": true,
    "block_material": "mushroom_stem",
    "silk_touch_drops": true,
    "fortune_drops": true,
    "required_tool": { "kind": "pickaxe", "min_tier": "iron" },
    "drops": [ { "item": "ruby", "amount": 2 }, { "item": "minecraft:cobblestone" } ]
  }
]
"#;

    #[test]
    fn test_definitions_from_str() {
        let configs = definitions_from_str(PACK).expect("valid pack");
        assert_eq!(configs.len(), 2);

        let pick = &configs[0];
        assert_eq!(pick.version, 1);
        assert!(pick.damageable);
        assert!(pick.behavior.contains(Behavior::ENCHANTABLE));
        assert_eq!(pick.hide, HideOptions::DURABILITY_BAR);
        assert_eq!(
            pick.tool,
            Some(ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Diamond))
        );
        assert!(pick.block_physics);

        let ore = &configs[1];
        assert_eq!(ore.version, 3);
        assert_eq!(ore.behavior, Behavior::SILK_TOUCH_DROPS | Behavior::FORTUNE_DROPS);
        assert_eq!(ore.required_tool.map(|r| r.min_tier), Some(ToolMaterial::Iron));
        assert_eq!(ore.block_drops[1].amount, 1);
    }

    #[test]
    fn test_unknown_tool_is_an_error() {
        let pack = r#"[{ "id": "x", "name": "X", "material": "stick",
                         "tool": { "kind": "spoon", "material": "iron" } }]"#;
        let err = definitions_from_str(pack).unwrap_err();
        assert!(matches!(err, AssetError::UnknownToolKind { ref value, .. } if value == "spoon"));

        let pack = r#"[{ "id": "y", "name": "Y", "material": "stone",
                         "required_tool": { "min_tier": "netherite" } }]"#;
        assert!(matches!(
            definitions_from_str(pack),
            Err(AssetError::UnknownToolMaterial { .. })
        ));
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let pack = r#"[{ "id": "x", "name": "X", "material": "stick", "colour": "red" }]"#;
        assert!(matches!(definitions_from_str(pack), Err(AssetError::Parse(_))));
    }

    #[test]
    fn test_register_all_reports() {
        let mut configs = definitions_from_str(PACK).unwrap();
        configs.push(DefinitionConfig::new("RUBY_PICK", "Dup", "stick"));
        configs.push(DefinitionConfig::new("broken", "Broken", ""));

        let mut store = DefinitionStore::new();
        let report = register_all(&mut store, configs);
        assert_eq!(report.registered, 2);
        assert_eq!(report.duplicates, vec!["RUBY_PICK"]);
        assert_eq!(report.invalid, vec!["broken"]);
        assert!(!report.is_clean());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_zero_amount_drop_is_invalid() {
        let pack = r#"[{ "id": "zero_ore", "name": "Zero Ore", "material": "stone",
                         "placeable": true, "block_material": "stone",
                         "drops": [ { "item": "stone", "amount": 0 } ] }]"#;
        let mut store = DefinitionStore::new();
        let report = register_all(&mut store, definitions_from_str(pack).unwrap());
        assert_eq!(report.registered, 0);
        assert_eq!(report.invalid, vec!["zero_ore"]);
        assert!(store.lookup_valid("zero_ore", false).is_none());
    }

    #[test]
    fn test_natives_from_str() {
        let pack = r#"
[
  { "name": "minecraft:stone" },
  { "name": "iron_pickaxe", "max_durability": 250, "tool": { "kind": "pickaxe", "material": "iron" } },
  { "name": "STONE" }
]
"#;
        let registry = natives_from_str(pack).expect("valid catalog");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.kind("stone", false).unwrap().max_stack, 64);
        let pick = registry.kind("minecraft:iron_pickaxe", false).unwrap();
        assert_eq!(pick.max_stack, 1);
        assert_eq!(pick.max_durability, Some(250));
    }

    #[test]
    fn test_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let items = dir.path().join("items.json");
        fs::write(&items, PACK).unwrap();
        assert_eq!(definitions_from_file(&items).unwrap().len(), 2);

        let missing = dir.path().join("missing.json");
        assert!(matches!(natives_from_file(&missing), Err(AssetError::Io(_))));
    }
}
