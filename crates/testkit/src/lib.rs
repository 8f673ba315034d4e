#![warn(missing_docs)]
//! Shared fixtures for engine tests: a sample definition pack, a sample
//! native catalog and a host that records block edits.

use customitems_core::{
    Behavior, BlockDrop, BlockHost, BlockLocation, DefinitionConfig, DefinitionStore, HideOptions,
    NativeKind, NativeRegistry, ToolMaterial, ToolRequirement, ToolSpec, ToolType,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Damageable custom pickaxe carried as a diamond pickaxe.
pub fn ruby_pick() -> DefinitionConfig {
    DefinitionConfig {
        damageable: true,
        max_durability: 100,
        tool: Some(ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Diamond)),
        behavior: Behavior::ENCHANTABLE,
        texture_id: Some(1),
        category: Some("tools".into()),
        ..DefinitionConfig::new("ruby_pick", "Ruby Pickaxe", "diamond_pickaxe")
    }
}

/// Plain stackable custom item.
pub fn ruby() -> DefinitionConfig {
    DefinitionConfig {
        texture_id: Some(2),
        category: Some("materials".into()),
        ..DefinitionConfig::new("ruby", "Ruby", "emerald")
    }
}

/// Placeable ore needing an iron pickaxe, dropping two rubies.
pub fn ruby_ore() -> DefinitionConfig {
    DefinitionConfig {
        placeable: true,
        block_material: Some("mushroom_stem".into()),
        block_texture_id: Some(3),
        behavior: Behavior::SILK_TOUCH_DROPS | Behavior::FORTUNE_DROPS,
        required_tool: Some(ToolRequirement {
            kind: Some(ToolType::Pickaxe),
            min_tier: ToolMaterial::Iron,
        }),
        block_drops: vec![BlockDrop {
            item: "ruby".into(),
            amount: 2,
        }],
        category: Some("blocks".into()),
        ..DefinitionConfig::new("ruby_ore", "Ruby Ore", "emerald_ore")
    }
}

/// Placeable block with no drop table; it drops itself.
pub fn speaker() -> DefinitionConfig {
    DefinitionConfig {
        placeable: true,
        block_material: Some("note_block".into()),
        hide: HideOptions::FLAGS,
        ..DefinitionConfig::new("speaker", "Speaker", "note_block")
    }
}

/// Definition that fails validation (no base material).
pub fn ghost() -> DefinitionConfig {
    DefinitionConfig::new("ghost", "Ghost", "")
}

/// Store holding every fixture above, registered in declaration order.
pub fn sample_store() -> DefinitionStore {
    let mut store = DefinitionStore::new();
    for config in [ruby_pick(), ruby(), ruby_ore(), speaker(), ghost()] {
        store.register(config);
    }
    store
}

/// Native catalog covering the fixture materials plus a few tools.
pub fn sample_catalog() -> NativeRegistry {
    NativeRegistry::new(vec![
        NativeKind::simple("air"),
        NativeKind::simple("stone"),
        NativeKind::simple("dirt"),
        NativeKind::simple("emerald"),
        NativeKind::simple("emerald_ore"),
        NativeKind::simple("mushroom_stem"),
        NativeKind::simple("note_block"),
        NativeKind::tool(
            "wooden_pickaxe",
            ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Wood),
            59,
        ),
        NativeKind::tool(
            "iron_pickaxe",
            ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Iron),
            250,
        ),
        NativeKind::tool(
            "diamond_pickaxe",
            ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Diamond),
            1561,
        ),
    ])
}

/// One `set_block` call seen by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostCall {
    /// Target location.
    pub location: BlockLocation,
    /// Material written.
    pub material: String,
    /// Update flag passed through.
    pub update: bool,
}

/// A [`BlockHost`] that remembers every call and the resulting block types.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    blocks: BTreeMap<BlockLocation, String>,
}

impl RecordingHost {
    /// Every call in order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Block type last written at `location`.
    pub fn block_at(&self, location: &BlockLocation) -> Option<&str> {
        self.blocks.get(location).map(String::as_str)
    }
}

impl BlockHost for RecordingHost {
    fn set_block(&mut self, location: &BlockLocation, material: &str, update: bool) {
        self.blocks.insert(location.clone(), material.to_string());
        self.calls.push(HostCall {
            location: location.clone(),
            material: material.to_string(),
            update,
        });
    }
}
