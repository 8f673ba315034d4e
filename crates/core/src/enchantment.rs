use serde::{Deserialize, Serialize};

/// Enchantments the engine reads when computing block drops and wear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnchantmentType {
    /// Drops the mined block itself instead of its drop table
    SilkTouch,
    /// Increases block drop amounts
    Fortune,
    /// Reduces durability loss
    Unbreaking,
}

impl EnchantmentType {
    /// Get the maximum level for this enchantment
    pub fn max_level(&self) -> u8 {
        match self {
            EnchantmentType::SilkTouch => 1,
            EnchantmentType::Fortune => 3,
            EnchantmentType::Unbreaking => 3,
        }
    }

    /// Check if this enchantment is compatible with another
    /// (Silk Touch and Fortune are mutually exclusive)
    pub fn is_compatible_with(&self, other: &EnchantmentType) -> bool {
        !matches!(
            (self, other),
            (EnchantmentType::SilkTouch, EnchantmentType::Fortune)
                | (EnchantmentType::Fortune, EnchantmentType::SilkTouch)
        )
    }
}

/// An enchantment with a specific level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enchantment {
    /// The type of enchantment
    pub enchantment_type: EnchantmentType,
    /// The level of the enchantment (1 to max_level)
    pub level: u8,
}

impl Enchantment {
    /// Create a new enchantment, clamping the level to `1..=max_level`.
    pub fn new(enchantment_type: EnchantmentType, level: u8) -> Self {
        let level = level.clamp(1, enchantment_type.max_level());
        Self {
            enchantment_type,
            level,
        }
    }
}
