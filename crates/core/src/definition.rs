//! Custom item definitions.
//!
//! A [`DefinitionConfig`] is the authoring-side record with named, defaulted
//! fields. The store validates it once at registration and freezes it into
//! an [`ItemDefinition`], which never changes afterwards.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::{ItemId, KeyError};
use crate::tool::{ToolRequirement, ToolSpec};

bitflags! {
    /// Per-item behavior switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Behavior: u16 {
        /// Can receive enchantments.
        const ENCHANTABLE = 1 << 0;
        /// Can be thrown.
        const THROWABLE = 1 << 1;
        /// Consumed on use.
        const CONSUMABLE = 1 << 2;
        /// Can be fired as a projectile.
        const PROJECTABLE = 1 << 3;
        /// Usable wherever its base material would be.
        const GENERIC_USE = 1 << 4;
        /// A silk touch tool drops the block item itself.
        const SILK_TOUCH_DROPS = 1 << 5;
        /// Fortune scales block drop amounts.
        const FORTUNE_DROPS = 1 << 6;
        /// Render with the enchantment glint.
        const GLOWS = 1 << 7;
    }
}

bitflags! {
    /// Presentation details hidden from players.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct HideOptions: u8 {
        /// Omit the durability lore line.
        const DURABILITY = 1 << 0;
        /// Leave the host durability bar untouched.
        const DURABILITY_BAR = 1 << 1;
        /// Hide every tooltip section the host supports.
        const FLAGS = 1 << 2;
        /// Hide attribute modifiers.
        const ATTRIBUTES = 1 << 3;
        /// Hide the enchantment list.
        const ENCHANTMENTS = 1 << 4;
    }
}

/// One entry of a placed block's drop table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDrop {
    /// Custom or native identifier of the dropped item.
    pub item: String,
    /// Base amount before fortune scaling.
    pub amount: u32,
}

/// Authoring record for a custom item.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionConfig {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Definition version; instances with an older version get refreshed.
    pub version: u32,
    /// Host material the instance is carried as.
    pub material: String,
    /// Item model/texture index.
    pub texture_id: Option<u32>,
    /// Block model/texture index when placed.
    pub block_texture_id: Option<u32>,
    /// Free-form category used by listings.
    pub category: Option<String>,
    /// Refresh instances even when their version matches.
    pub force_update: bool,
    /// Whether the item wears down.
    pub damageable: bool,
    /// Damage at which the item breaks.
    pub max_durability: u32,
    /// Damage freshly encoded instances start with.
    pub initial_damage: u32,
    /// Presentation switches.
    pub hide: HideOptions,
    /// Behavior switches.
    pub behavior: Behavior,
    /// Whether the item may be placed as a block.
    pub placeable: bool,
    /// Host block type shown when placed.
    pub block_material: Option<String>,
    /// Whether the placed block obeys host physics.
    pub block_physics: bool,
    /// Light emitted by the placed block (0-15).
    pub block_light_level: u8,
    /// Tool class and tier when held.
    pub tool: Option<ToolSpec>,
    /// Tool needed to break the placed block.
    pub required_tool: Option<ToolRequirement>,
    /// Drops of the placed block; empty means the block drops itself.
    pub block_drops: Vec<BlockDrop>,
}

impl DefinitionConfig {
    /// Start a config with every optional field at its default.
    pub fn new(id: impl Into<String>, name: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: 1,
            material: material.into(),
            texture_id: None,
            block_texture_id: None,
            category: None,
            force_update: false,
            damageable: false,
            max_durability: 0,
            initial_damage: 0,
            hide: HideOptions::empty(),
            behavior: Behavior::empty(),
            placeable: false,
            block_material: None,
            block_physics: true,
            block_light_level: 0,
            tool: None,
            required_tool: None,
            block_drops: Vec::new(),
        }
    }

    /// Check the config for construction-time problems.
    pub fn problems(&self) -> Vec<DefinitionProblem> {
        let mut problems = Vec::new();
        if let Err(err) = ItemId::parse(&self.id) {
            problems.push(DefinitionProblem::BadId(err));
        }
        if self.material.trim().is_empty() {
            problems.push(DefinitionProblem::MissingMaterial);
        }
        if self.damageable {
            if self.max_durability == 0 {
                problems.push(DefinitionProblem::ZeroDurability);
            } else if self.initial_damage >= self.max_durability {
                problems.push(DefinitionProblem::InitialDamageTooHigh {
                    initial: self.initial_damage,
                    max: self.max_durability,
                });
            }
        }
        if self.placeable
            && self
                .block_material
                .as_deref()
                .map_or(true, |m| m.trim().is_empty())
        {
            problems.push(DefinitionProblem::MissingBlockMaterial);
        }
        if self.block_light_level > 15 {
            problems.push(DefinitionProblem::LightLevel(self.block_light_level));
        }
        if self.block_drops.iter().any(|d| d.item.trim().is_empty()) {
            problems.push(DefinitionProblem::EmptyDrop);
        }
        if let Some(drop) = self.block_drops.iter().find(|d| d.amount == 0) {
            problems.push(DefinitionProblem::ZeroDropAmount(drop.item.clone()));
        }
        problems
    }
}

/// Reason a definition failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionProblem {
    /// The id is malformed.
    #[error("invalid id: {0}")]
    BadId(KeyError),
    /// No backing host material.
    #[error("missing base material")]
    MissingMaterial,
    /// Damageable with no durability.
    #[error("damageable item has zero max durability")]
    ZeroDurability,
    /// Starts broken.
    #[error("initial damage {initial} must be below max durability {max}")]
    InitialDamageTooHigh {
        /// Configured initial damage.
        initial: u32,
        /// Configured max durability.
        max: u32,
    },
    /// Placeable without a block type.
    #[error("placeable item has no block material")]
    MissingBlockMaterial,
    /// Light level above 15.
    #[error("block light level {0} exceeds 15")]
    LightLevel(u8),
    /// A drop table entry names no item.
    #[error("block drop entry has an empty item id")]
    EmptyDrop,
    /// A drop table entry yields nothing.
    #[error("block drop '{0}' has amount 0")]
    ZeroDropAmount(String),
}

/// A registered custom item. Immutable after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDefinition {
    config: DefinitionConfig,
    problems: Vec<DefinitionProblem>,
}

impl ItemDefinition {
    pub(crate) fn from_config(mut config: DefinitionConfig) -> Self {
        config.id = config.id.trim().to_string();
        let problems = config.problems();
        Self { config, problems }
    }

    /// Identifier as registered (case preserved).
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Definition version.
    pub fn version(&self) -> u32 {
        self.config.version
    }

    /// Host material the instance is carried as.
    pub fn material(&self) -> &str {
        &self.config.material
    }

    /// Item texture index.
    pub fn texture_id(&self) -> Option<u32> {
        self.config.texture_id
    }

    /// Block texture index.
    pub fn block_texture_id(&self) -> Option<u32> {
        self.config.block_texture_id
    }

    /// Category label.
    pub fn category(&self) -> Option<&str> {
        self.config.category.as_deref()
    }

    /// Whether instances are refreshed regardless of version.
    pub fn force_update(&self) -> bool {
        self.config.force_update
    }

    /// Whether durability applies.
    pub fn is_damageable(&self) -> bool {
        self.config.damageable
    }

    /// Damage at which the item breaks (meaningless unless damageable).
    pub fn max_durability(&self) -> u32 {
        self.config.max_durability
    }

    /// Damage new instances start with.
    pub fn initial_damage(&self) -> u32 {
        self.config.initial_damage
    }

    /// Presentation switches.
    pub fn hide(&self) -> HideOptions {
        self.config.hide
    }

    /// Behavior switches.
    pub fn behavior(&self) -> Behavior {
        self.config.behavior
    }

    /// Shorthand for a behavior check.
    pub fn has(&self, behavior: Behavior) -> bool {
        self.config.behavior.contains(behavior)
    }

    /// Whether the item may occupy a world location as a block.
    pub fn is_placeable(&self) -> bool {
        self.config.placeable
    }

    /// Host block type shown when placed.
    pub fn block_material(&self) -> Option<&str> {
        self.config.block_material.as_deref()
    }

    /// Whether the placed block obeys host physics.
    pub fn block_physics(&self) -> bool {
        self.config.block_physics
    }

    /// Light emitted by the placed block.
    pub fn block_light_level(&self) -> u8 {
        self.config.block_light_level
    }

    /// Tool class and tier when held.
    pub fn tool(&self) -> Option<ToolSpec> {
        self.config.tool
    }

    /// Tool needed to break the placed block.
    pub fn required_tool(&self) -> Option<ToolRequirement> {
        self.config.required_tool
    }

    /// Drop table of the placed block.
    pub fn block_drops(&self) -> &[BlockDrop] {
        &self.config.block_drops
    }

    /// Validation problems found at registration.
    pub fn problems(&self) -> &[DefinitionProblem] {
        &self.problems
    }

    /// True when registration found no problems.
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}
