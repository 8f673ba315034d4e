//! The host's generic item-instance representation.
//!
//! An [`ItemInstance`] is what inventories hold and what the world drops:
//! a material marker, a stack amount and a bag of metadata. The engine never
//! keeps instances around; it reads them and hands back new values.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::enchantment::{Enchantment, EnchantmentType};

/// Material marker of the canonical empty instance.
pub const AIR: &str = "air";

/// A value stored in an instance's tag container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagValue {
    /// String payload.
    Str(String),
    /// Integer payload.
    Int(i64),
}

bitflags! {
    /// Tooltip sections the host should hide when rendering an instance.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TooltipFlags: u8 {
        /// Hide the enchantment list.
        const ENCHANTMENTS = 1 << 0;
        /// Hide attribute modifiers.
        const ATTRIBUTES = 1 << 1;
        /// Hide the unbreakable marker.
        const UNBREAKABLE = 1 << 2;
        /// Hide everything else the host would normally append.
        const MISC = 1 << 3;
    }
}

/// Mutable metadata attached to an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Display name override.
    pub display_name: Option<String>,
    /// Tooltip lines.
    pub lore: Vec<String>,
    /// Enchantments applied to this instance.
    pub enchantments: Vec<Enchantment>,
    /// Render the enchantment glint even without enchantments.
    pub glint: bool,
    /// Hidden tooltip sections.
    pub hidden: TooltipFlags,
    /// Host durability bar value (native damage units).
    pub damage: Option<u32>,
    /// Persistent tag container.
    pub tags: BTreeMap<String, TagValue>,
}

impl ItemMeta {
    /// Read a string tag.
    pub fn tag_str(&self, key: &str) -> Option<&str> {
        match self.tags.get(key) {
            Some(TagValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Read an integer tag.
    pub fn tag_int(&self, key: &str) -> Option<i64> {
        match self.tags.get(key) {
            Some(TagValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    /// Insert or replace a tag.
    pub fn set_tag(&mut self, key: impl Into<String>, value: TagValue) {
        self.tags.insert(key.into(), value);
    }

    /// Remove a tag, returning its previous value.
    pub fn remove_tag(&mut self, key: &str) -> Option<TagValue> {
        self.tags.remove(key)
    }

    /// Get the level of a specific enchantment, or 0 if not present
    pub fn enchantment_level(&self, enchant_type: EnchantmentType) -> u8 {
        self.enchantments
            .iter()
            .find(|e| e.enchantment_type == enchant_type)
            .map(|e| e.level)
            .unwrap_or(0)
    }
}

/// A stack of items as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Host material/type marker (e.g. "diamond_hoe").
    pub material: String,
    /// Quantity in stack.
    pub amount: u32,
    /// Metadata, including any embedded identity tag.
    pub meta: ItemMeta,
}

impl ItemInstance {
    /// Create a plain instance with empty metadata.
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            meta: ItemMeta::default(),
        }
    }

    /// The canonical "no item" value.
    pub fn empty() -> Self {
        Self::new(AIR, 0)
    }

    /// True for air or a zero-sized stack.
    pub fn is_empty(&self) -> bool {
        self.amount == 0 || self.material.eq_ignore_ascii_case(AIR)
    }

    /// Copy of this instance with a different amount.
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    /// Split `count` items off into a new stack. Returns `None` when the
    /// stack holds fewer than `count` items or `count` is zero.
    pub fn split(&mut self, count: u32) -> Option<ItemInstance> {
        if count == 0 || count > self.amount {
            return None;
        }
        self.amount -= count;
        Some(self.with_amount(count))
    }

    /// Check if this stack can merge with another stack.
    pub fn can_stack_with(&self, other: &ItemInstance) -> bool {
        self.material == other.material && self.meta == other.meta
    }

    /// Add an enchantment to this instance.
    /// Returns true if the enchantment was added or upgraded.
    pub fn add_enchantment(&mut self, enchantment: Enchantment) -> bool {
        let enchants = &mut self.meta.enchantments;
        if enchants
            .iter()
            .any(|existing| !existing.enchantment_type.is_compatible_with(&enchantment.enchantment_type))
        {
            return false;
        }

        if let Some(existing) = enchants
            .iter_mut()
            .find(|existing| existing.enchantment_type == enchantment.enchantment_type)
        {
            existing.level = existing.level.max(enchantment.level);
            return true;
        }

        enchants.push(enchantment);
        true
    }
}

impl Default for ItemInstance {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_instance() {
        let empty = ItemInstance::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.material, AIR);
        assert!(ItemInstance::new("stone", 0).is_empty());
        assert!(ItemInstance::new("AIR", 3).is_empty());
        assert!(!ItemInstance::new("stone", 1).is_empty());
    }

    #[test]
    fn test_tags() {
        let mut meta = ItemMeta::default();
        meta.set_tag("a", TagValue::Str("x".into()));
        meta.set_tag("b", TagValue::Int(7));

        assert_eq!(meta.tag_str("a"), Some("x"));
        assert_eq!(meta.tag_int("b"), Some(7));
        // Wrong type reads as absent
        assert_eq!(meta.tag_int("a"), None);
        assert_eq!(meta.tag_str("b"), None);

        assert_eq!(meta.remove_tag("a"), Some(TagValue::Str("x".into())));
        assert_eq!(meta.tag_str("a"), None);
    }

    #[test]
    fn test_split_keeps_metadata() {
        let mut stack = ItemInstance::new("emerald", 10);
        stack.meta.set_tag("id", TagValue::Str("gem".into()));

        let half = stack.split(4).expect("enough items");
        assert_eq!(stack.amount, 6);
        assert_eq!(half.amount, 4);
        assert_eq!(half.meta, stack.meta);
        assert!(half.can_stack_with(&stack));

        assert!(stack.split(0).is_none());
        assert!(stack.split(7).is_none());
    }

    #[test]
    fn test_enchantment_upgrade_and_conflict() {
        let mut pick = ItemInstance::new("diamond_pickaxe", 1);

        assert!(pick.add_enchantment(Enchantment::new(EnchantmentType::Fortune, 1)));
        assert!(pick.add_enchantment(Enchantment::new(EnchantmentType::Fortune, 3)));
        assert_eq!(pick.meta.enchantment_level(EnchantmentType::Fortune), 3);
        assert_eq!(pick.meta.enchantments.len(), 1);

        // Silk Touch conflicts with Fortune
        assert!(!pick.add_enchantment(Enchantment::new(EnchantmentType::SilkTouch, 1)));
        assert_eq!(pick.meta.enchantment_level(EnchantmentType::SilkTouch), 0);
    }
}
