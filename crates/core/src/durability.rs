//! Durability state machine over the codec.
//!
//! Damage lives in the instance's tag container. `0` is unused, anything at
//! or past the definition's maximum is broken, and a broken item has no
//! instance at all: callers replace it with [`ItemInstance::empty`].

use std::sync::Arc;

use crate::codec::{Codec, DAMAGE_TAG};
use crate::definition::ItemDefinition;
use crate::instance::ItemInstance;

/// Reads and writes damage on custom item instances.
#[derive(Clone, Copy)]
pub struct Durability<'a> {
    codec: Codec<'a>,
}

impl<'a> Durability<'a> {
    /// Wrap a codec.
    pub fn new(codec: Codec<'a>) -> Self {
        Self { codec }
    }

    /// Current damage, or `None` for non-custom or non-damageable instances.
    pub fn get_damage(&self, instance: &ItemInstance) -> Option<u32> {
        let definition = self.damageable(instance)?;
        let stored = instance
            .meta
            .tag_int(DAMAGE_TAG)
            .unwrap_or_else(|| i64::from(definition.initial_damage()));
        Some(clamp_damage(stored, definition.max_durability()))
    }

    /// Damage at which the instance breaks, or `None` when durability doesn't apply.
    pub fn get_max_damage(&self, instance: &ItemInstance) -> Option<u32> {
        self.damageable(instance).map(|def| def.max_durability())
    }

    /// Set the damage of an instance.
    ///
    /// Returns `(false, None)` when durability doesn't apply. Otherwise
    /// `applied` is true and the result is either the re-encoded instance or
    /// `None` when `amount` reached the maximum (the item broke). Amounts at
    /// or below zero mean fully repaired. The input is never modified.
    pub fn set_damage(&self, instance: &ItemInstance, amount: i64) -> (bool, Option<ItemInstance>) {
        let Some(definition) = self.damageable(instance) else {
            return (false, None);
        };
        let max = definition.max_durability();
        if amount >= i64::from(max) {
            return (true, None);
        }

        let mut damaged = instance.clone();
        self.codec
            .write_damage(&mut damaged, definition, clamp_damage(amount, max));
        (true, Some(damaged))
    }

    /// Add `delta` (negative repairs) to the current damage.
    pub fn damage_by(&self, instance: &ItemInstance, delta: i64) -> (bool, Option<ItemInstance>) {
        match self.get_damage(instance) {
            Some(current) => self.set_damage(instance, i64::from(current).saturating_add(delta)),
            None => (false, None),
        }
    }

    fn damageable(&self, instance: &ItemInstance) -> Option<&'a Arc<ItemDefinition>> {
        self.codec
            .decode(instance)
            .filter(|def| def.is_valid() && def.is_damageable())
    }
}

fn clamp_damage(amount: i64, max: u32) -> u32 {
    u32::try_from(amount.clamp(0, i64::from(max))).unwrap_or(max)
}
