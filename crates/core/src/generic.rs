//! Custom-or-native item resolution.

use std::sync::Arc;

use crate::codec::Codec;
use crate::definition::ItemDefinition;
use crate::instance::ItemInstance;
use crate::native::{NativeCatalog, NativeKind};

/// What a resolved identifier refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// A registered, valid custom definition.
    Custom(Arc<ItemDefinition>),
    /// A host built-in type.
    Native(NativeKind),
}

/// A custom item, a native item, or nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericItem {
    kind: Option<ItemKind>,
}

impl GenericItem {
    /// The "no such item" value.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Wrap a custom definition.
    pub fn custom(definition: Arc<ItemDefinition>) -> Self {
        Self {
            kind: Some(ItemKind::Custom(definition)),
        }
    }

    /// Wrap a native kind.
    pub fn native(kind: NativeKind) -> Self {
        Self {
            kind: Some(ItemKind::Native(kind)),
        }
    }

    /// False only for the absent value.
    pub fn exists(&self) -> bool {
        self.kind.is_some()
    }

    /// True for the custom variant.
    pub fn is_custom(&self) -> bool {
        matches!(self.kind, Some(ItemKind::Custom(_)))
    }

    /// The underlying variant.
    pub fn kind(&self) -> Option<&ItemKind> {
        self.kind.as_ref()
    }

    /// Custom definition, if any.
    pub fn definition(&self) -> Option<&Arc<ItemDefinition>> {
        match &self.kind {
            Some(ItemKind::Custom(def)) => Some(def),
            _ => None,
        }
    }

    /// Native kind, if any.
    pub fn native_kind(&self) -> Option<&NativeKind> {
        match &self.kind {
            Some(ItemKind::Native(kind)) => Some(kind),
            _ => None,
        }
    }

    /// Custom id or native name.
    pub fn id(&self) -> Option<&str> {
        match &self.kind {
            Some(ItemKind::Custom(def)) => Some(def.id()),
            Some(ItemKind::Native(kind)) => Some(&kind.name),
            None => None,
        }
    }

    /// Build an instance of `amount` items.
    pub fn to_instance(&self, codec: &Codec<'_>, amount: u32) -> Option<ItemInstance> {
        match &self.kind {
            Some(ItemKind::Custom(def)) => Some(codec.encode(def, amount)),
            Some(ItemKind::Native(kind)) => Some(ItemInstance::new(kind.name.clone(), amount)),
            None => None,
        }
    }
}

/// Resolves identifiers against custom definitions first, then the native catalog.
#[derive(Clone, Copy)]
pub struct ItemResolver<'a> {
    codec: Codec<'a>,
    catalog: &'a dyn NativeCatalog,
}

impl<'a> ItemResolver<'a> {
    /// Resolver over a codec and a native catalog.
    pub fn new(codec: Codec<'a>, catalog: &'a dyn NativeCatalog) -> Self {
        Self { codec, catalog }
    }

    /// The codec custom items are encoded with.
    pub fn codec(&self) -> &Codec<'a> {
        &self.codec
    }

    /// The native catalog.
    pub fn catalog(&self) -> &'a dyn NativeCatalog {
        self.catalog
    }

    /// Resolve an identifier. Never fails; unknown ids give [`GenericItem::absent`].
    pub fn resolve(&self, id: &str, case_sensitive: bool) -> GenericItem {
        if let Some(definition) = self.codec.lookup(id, case_sensitive) {
            return GenericItem::custom(Arc::clone(definition));
        }
        match self.catalog.kind(id, case_sensitive) {
            Some(kind) => GenericItem::native(kind.clone()),
            None => GenericItem::absent(),
        }
    }

    /// Resolve whatever an instance holds: its custom definition, else its material.
    pub fn resolve_instance(&self, instance: &ItemInstance) -> GenericItem {
        if instance.is_empty() {
            return GenericItem::absent();
        }
        if let Some(definition) = self.codec.decode(instance).filter(|def| def.is_valid()) {
            return GenericItem::custom(Arc::clone(definition));
        }
        self.catalog
            .kind(&instance.material, false)
            .map_or_else(GenericItem::absent, |kind| GenericItem::native(kind.clone()))
    }
}
