//! Tool classes and tiers used by mining rules.

use serde::{Deserialize, Serialize};

/// Tool types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    /// Pickaxe - mines stone, ores
    Pickaxe,
    /// Axe - chops wood
    Axe,
    /// Shovel - digs dirt, sand, gravel
    Shovel,
    /// Sword - combat weapon
    Sword,
    /// Hoe - tills farmland
    Hoe,
}

impl ToolType {
    /// Parse a tool type from a string (e.g., "pickaxe", "axe").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pickaxe" => Some(ToolType::Pickaxe),
            "axe" => Some(ToolType::Axe),
            "shovel" => Some(ToolType::Shovel),
            "sword" => Some(ToolType::Sword),
            "hoe" => Some(ToolType::Hoe),
            _ => None,
        }
    }
}

/// Tool material tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ToolMaterial {
    /// Wooden tools (tier 0)
    Wood = 0,
    /// Stone tools (tier 1)
    Stone = 1,
    /// Iron tools (tier 2)
    Iron = 2,
    /// Diamond tools (tier 3)
    Diamond = 3,
    /// Gold tools (very fast but weak mining tier - same tier as wood)
    Gold = 4,
}

impl ToolMaterial {
    /// Parse a material from a string (e.g., "wood", "iron"). "wooden" and
    /// "golden" are accepted as aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wood" | "wooden" => Some(ToolMaterial::Wood),
            "stone" => Some(ToolMaterial::Stone),
            "iron" => Some(ToolMaterial::Iron),
            "diamond" => Some(ToolMaterial::Diamond),
            "gold" | "golden" => Some(ToolMaterial::Gold),
            _ => None,
        }
    }

    /// Get the harvest tier of this material (0=Wood, 1=Stone, 2=Iron, 3=Diamond).
    /// Gold has the same harvest tier as Wood (0) despite being valuable.
    pub fn harvest_tier(self) -> u8 {
        match self {
            ToolMaterial::Wood | ToolMaterial::Gold => 0,
            ToolMaterial::Stone => 1,
            ToolMaterial::Iron => 2,
            ToolMaterial::Diamond => 3,
        }
    }

    /// Check if this material can mine blocks requiring a certain tier
    pub fn can_mine_tier(self, required: ToolMaterial) -> bool {
        self.harvest_tier() >= required.harvest_tier()
    }
}

/// The tool class and tier an item acts as when held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool class.
    pub kind: ToolType,
    /// Tool tier.
    pub material: ToolMaterial,
}

impl ToolSpec {
    /// Create a tool spec.
    pub fn new(kind: ToolType, material: ToolMaterial) -> Self {
        Self { kind, material }
    }
}

/// Minimum tool needed to break a placed custom block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolRequirement {
    /// Required tool class; `None` accepts any class.
    pub kind: Option<ToolType>,
    /// Minimum harvest tier.
    pub min_tier: ToolMaterial,
}

impl ToolRequirement {
    /// Check whether the held tool (if any) satisfies this requirement.
    /// An empty hand never does.
    pub fn is_met_by(&self, tool: Option<ToolSpec>) -> bool {
        match tool {
            Some(tool) => {
                self.kind.map_or(true, |kind| kind == tool.kind)
                    && tool.material.can_mine_tier(self.min_tier)
            }
            None => false,
        }
    }
}
