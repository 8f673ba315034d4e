#![warn(missing_docs)]
//! Core data model of the custom item engine: definitions, the store, the
//! identity codec, durability and custom-or-native resolution.

pub mod codec;
pub mod definition;
pub mod durability;
pub mod enchantment;
pub mod generic;
pub mod host;
pub mod instance;
pub mod key;
pub mod native;
pub mod store;
pub mod tool;

// Re-export commonly used types
pub use codec::Codec;
pub use definition::{
    Behavior, BlockDrop, DefinitionConfig, DefinitionProblem, HideOptions, ItemDefinition,
};
pub use durability::Durability;
pub use enchantment::{Enchantment, EnchantmentType};
pub use generic::{GenericItem, ItemKind, ItemResolver};
pub use host::{BlockHost, BlockLocation};
pub use instance::{ItemInstance, ItemMeta, TagValue, TooltipFlags, AIR};
pub use key::{ItemId, KeyError, NamespaceAliases};
pub use native::{NativeCatalog, NativeKind, NativeRegistry, DEFAULT_MAX_STACK};
pub use store::{DefinitionStore, ItemHandle, RegisterStatus, Registration, SharedStore};
pub use tool::{ToolMaterial, ToolRequirement, ToolSpec, ToolType};
