#![warn(missing_docs)]
//! Definition pack schema and loading.
//!
//! Packs are JSON arrays. Custom item packs map onto
//! [`customitems_core::DefinitionConfig`]; native catalogs map onto
//! [`customitems_core::NativeRegistry`].

mod loader;

pub use loader::{
    definitions_from_file, definitions_from_str, natives_from_file, natives_from_str, register_all,
    LoadReport,
};

use serde::Deserialize;
use thiserror::Error;

/// One custom item as authored in a pack.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDefinitionFile {
    /// Unique identifier (e.g., "ruby_pick").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Host material the item is carried as.
    pub material: String,
    /// Definition version; bump to refresh existing instances.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Item texture index.
    #[serde(default)]
    pub texture_id: Option<u32>,
    /// Placed block texture index.
    #[serde(default)]
    pub block_texture_id: Option<u32>,
    /// Listing category.
    #[serde(default)]
    pub category: Option<String>,
    /// Refresh instances even at the same version.
    #[serde(default)]
    pub force_update: bool,
    /// Damage and break with use.
    #[serde(default)]
    pub damageable: bool,
    /// Damage at which the item breaks.
    #[serde(default)]
    pub max_durability: u32,
    /// Damage new instances start with.
    #[serde(default)]
    pub initial_damage: u32,
    /// Omit the durability lore line.
    #[serde(default)]
    pub hide_durability: bool,
    /// Leave the host durability bar alone.
    #[serde(default)]
    pub hide_durability_bar: bool,
    /// Hide all host tooltip sections.
    #[serde(default)]
    pub hide_flags: bool,
    /// Hide attribute modifiers.
    #[serde(default)]
    pub hide_attributes: bool,
    /// Hide enchantments.
    #[serde(default)]
    pub hide_enchantments: bool,
    /// Accepts enchantments.
    #[serde(default)]
    pub enchantable: bool,
    /// Can be thrown.
    #[serde(default)]
    pub throwable: bool,
    /// Consumed on use.
    #[serde(default)]
    pub consumable: bool,
    /// Can be fired.
    #[serde(default)]
    pub projectable: bool,
    /// Works wherever its material would.
    #[serde(default)]
    pub generic_use: bool,
    /// Silk touch drops the block item.
    #[serde(default)]
    pub silk_touch_drops: bool,
    /// Fortune multiplies block drops.
    #[serde(default)]
    pub fortune_drops: bool,
    /// Enchantment glint.
    #[serde(default)]
    pub glows: bool,
    /// May be placed as a block.
    #[serde(default)]
    pub placeable: bool,
    /// Host block type when placed.
    #[serde(default)]
    pub block_material: Option<String>,
    /// Placed block obeys physics.
    #[serde(default = "default_true")]
    pub block_physics: bool,
    /// Light level of the placed block.
    #[serde(default)]
    pub block_light_level: u8,
    /// Tool class and tier when held.
    #[serde(default)]
    pub tool: Option<ToolFile>,
    /// Tool needed to break the placed block.
    #[serde(default)]
    pub required_tool: Option<RequiredToolFile>,
    /// Placed block drop table.
    #[serde(default)]
    pub drops: Vec<DropFile>,
}

/// Tool class + tier, as strings ("pickaxe", "iron").
#[derive(Debug, Deserialize)]
pub struct ToolFile {
    /// Tool class.
    pub kind: String,
    /// Tool tier.
    pub material: String,
}

/// Tool requirement of a placed block.
/// A missing `kind` accepts any tool class at or above `min_tier`.
#[derive(Debug, Deserialize)]
pub struct RequiredToolFile {
    /// Required class, if any.
    #[serde(default)]
    pub kind: Option<String>,
    /// Minimum tier ("wood", "stone", "iron", "diamond", "gold").
    pub min_tier: String,
}

/// Drop table entry.
#[derive(Debug, Deserialize)]
pub struct DropFile {
    /// Custom or native id of the dropped item.
    pub item: String,
    /// Amount before fortune.
    #[serde(default = "default_amount")]
    pub amount: u32,
}

/// One host built-in item type in a native catalog pack.
#[derive(Debug, Deserialize)]
pub struct NativeDefinition {
    /// Type name, namespace optional ("minecraft:stone").
    pub name: String,
    /// Native durability for tools and armor.
    #[serde(default)]
    pub max_durability: Option<u32>,
    /// Stack limit (defaults to 64, or 1 for tools).
    #[serde(default)]
    pub max_stack: Option<u32>,
    /// Tool class and tier.
    #[serde(default)]
    pub tool: Option<ToolFile>,
}

/// Errors emitted during pack loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading packs.
    #[error("failed to read pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse pack: {0}")]
    Parse(#[from] serde_json::Error),
    /// Unrecognized tool class.
    #[error("{item}: unknown tool kind '{value}'")]
    UnknownToolKind {
        /// Entry that referenced it.
        item: String,
        /// Offending value.
        value: String,
    },
    /// Unrecognized tool tier.
    #[error("{item}: unknown tool material '{value}'")]
    UnknownToolMaterial {
        /// Entry that referenced it.
        item: String,
        /// Offending value.
        value: String,
    },
}

fn default_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_amount() -> u32 {
    1
}
