//! Identity codec.
//!
//! Custom items travel through the host as ordinary [`ItemInstance`]s. The
//! codec writes the definition id into the instance's tag container and
//! reads it back. The tag does not depend on the stack amount, so stacks
//! split or copied by the host decode to the same definition.

use std::sync::Arc;

use crate::definition::{Behavior, HideOptions, ItemDefinition};
use crate::instance::{ItemInstance, ItemMeta, TagValue, TooltipFlags};
use crate::key::{ids_match, NamespaceAliases, DEFAULT_NAMESPACE_ALIASES};
use crate::native::NativeCatalog;
use crate::store::DefinitionStore;

/// Tag holding the definition id.
pub const ID_TAG: &str = "customitems:id";
/// Tag holding the definition version the instance was encoded with.
pub const VERSION_TAG: &str = "customitems:version";
/// Tag holding the current damage of damageable items.
pub const DAMAGE_TAG: &str = "customitems:damage";
/// Prefix of the durability lore line.
pub const DURABILITY_LORE_PREFIX: &str = "Durability: ";

/// Encoder/decoder bound to one store snapshot.
#[derive(Clone, Copy)]
pub struct Codec<'a> {
    store: &'a DefinitionStore,
    catalog: Option<&'a dyn NativeCatalog>,
    aliases: Option<&'a NamespaceAliases>,
}

impl<'a> Codec<'a> {
    /// Codec over `store` with default namespace aliases and no native catalog.
    pub fn new(store: &'a DefinitionStore) -> Self {
        Self {
            store,
            catalog: None,
            aliases: None,
        }
    }

    /// Use `catalog` to scale the host durability bar.
    pub fn with_catalog(mut self, catalog: &'a dyn NativeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Recognize `aliases` instead of the defaults.
    pub fn with_aliases(mut self, aliases: &'a NamespaceAliases) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// The store this codec decodes against.
    pub fn store(&self) -> &'a DefinitionStore {
        self.store
    }

    /// Build an instance of `definition` holding `amount` items.
    pub fn encode(&self, definition: &ItemDefinition, amount: u32) -> ItemInstance {
        let hide = definition.hide();
        let mut meta = ItemMeta {
            display_name: Some(definition.name().to_string()),
            glint: definition.has(Behavior::GLOWS),
            hidden: tooltip_flags(hide),
            ..ItemMeta::default()
        };
        meta.set_tag(ID_TAG, TagValue::Str(definition.id().to_string()));
        meta.set_tag(VERSION_TAG, TagValue::Int(i64::from(definition.version())));

        let mut instance = ItemInstance {
            material: definition.material().to_string(),
            amount,
            meta,
        };
        if definition.is_damageable() {
            self.write_damage(&mut instance, definition, definition.initial_damage());
        }
        instance
    }

    /// Recover the definition an instance was encoded from.
    ///
    /// Only the embedded id is consulted, matched exactly against the
    /// registered id. Untagged instances are the common case and yield `None`.
    pub fn decode(&self, instance: &ItemInstance) -> Option<&'a Arc<ItemDefinition>> {
        if instance.is_empty() {
            return None;
        }
        let id = instance.meta.tag_str(ID_TAG)?;
        self.store.lookup(id, true)
    }

    /// Registered id of the definition an instance decodes to.
    pub fn decode_id(&self, instance: &ItemInstance) -> Option<String> {
        self.decode(instance).map(|def| def.id().to_string())
    }

    /// Identity check against a target id.
    pub fn matches_id(&self, instance: &ItemInstance, id: &str, case_sensitive: bool) -> bool {
        self.decode(instance)
            .is_some_and(|def| ids_match(def.id(), id, case_sensitive))
    }

    /// Resolve free text, bare or namespace-qualified, to a valid definition.
    pub fn lookup(&self, id: &str, case_sensitive: bool) -> Option<&'a Arc<ItemDefinition>> {
        if id.trim().is_empty() {
            return None;
        }
        self.store
            .lookup_valid(id, case_sensitive)
            .or_else(|| {
                let bare = self.strip_namespace(id)?;
                self.store.lookup_valid(bare, case_sensitive)
            })
    }

    /// Re-encode an instance whose definition has moved on.
    ///
    /// Returns `None` when the instance is not custom or is already current.
    /// Amount, enchantments and damage carry over; damage is capped just
    /// below the new maximum so a refresh never breaks an item.
    pub fn refresh(&self, instance: &ItemInstance) -> Option<ItemInstance> {
        let definition = self.decode(instance)?;
        let encoded_version = instance.meta.tag_int(VERSION_TAG).unwrap_or(0);
        if encoded_version >= i64::from(definition.version()) && !definition.force_update() {
            return None;
        }

        let mut refreshed = self.encode(definition, instance.amount);
        refreshed.meta.enchantments = instance.meta.enchantments.clone();
        if definition.is_damageable() {
            if let Some(damage) = instance.meta.tag_int(DAMAGE_TAG) {
                let cap = definition.max_durability().saturating_sub(1);
                let damage = u32::try_from(damage.max(0)).unwrap_or(u32::MAX).min(cap);
                self.write_damage(&mut refreshed, definition, damage);
            }
        }

        (refreshed != *instance).then_some(refreshed)
    }

    /// Store `damage` in the instance's tag, lore line and host bar.
    pub(crate) fn write_damage(&self, instance: &mut ItemInstance, definition: &ItemDefinition, damage: u32) {
        let max = definition.max_durability();
        instance
            .meta
            .set_tag(DAMAGE_TAG, TagValue::Int(i64::from(damage)));

        instance
            .meta
            .lore
            .retain(|line| !line.starts_with(DURABILITY_LORE_PREFIX));
        if !definition.hide().contains(HideOptions::DURABILITY) {
            let remaining = max.saturating_sub(damage);
            instance
                .meta
                .lore
                .push(format!("{DURABILITY_LORE_PREFIX}{remaining} / {max}"));
        }

        if !definition.hide().contains(HideOptions::DURABILITY_BAR) {
            instance.meta.damage = Some(self.bar_value(definition, damage));
        }
    }

    /// Map custom damage onto the base material's native durability range.
    fn bar_value(&self, definition: &ItemDefinition, damage: u32) -> u32 {
        let native_max = self
            .catalog
            .and_then(|catalog| catalog.kind(definition.material(), false))
            .and_then(|kind| kind.max_durability);
        match native_max {
            Some(native_max) if definition.max_durability() > 0 => {
                let scaled = u64::from(damage) * u64::from(native_max)
                    / u64::from(definition.max_durability());
                u32::try_from(scaled).unwrap_or(native_max)
            }
            _ => damage,
        }
    }

    fn strip_namespace<'s>(&self, id: &'s str) -> Option<&'s str> {
        match self.aliases {
            Some(aliases) => aliases.strip(id),
            None => {
                let (namespace, rest) = id.trim().split_once(':')?;
                (!rest.is_empty()
                    && DEFAULT_NAMESPACE_ALIASES
                        .iter()
                        .any(|alias| alias.eq_ignore_ascii_case(namespace)))
                .then_some(rest)
            }
        }
    }
}

fn tooltip_flags(hide: HideOptions) -> TooltipFlags {
    if hide.contains(HideOptions::FLAGS) {
        return TooltipFlags::all();
    }
    let mut flags = TooltipFlags::empty();
    if hide.contains(HideOptions::ENCHANTMENTS) {
        flags |= TooltipFlags::ENCHANTMENTS;
    }
    if hide.contains(HideOptions::ATTRIBUTES) {
        flags |= TooltipFlags::ATTRIBUTES;
    }
    flags
}
