//! Public query API over the engine.
//!
//! [`CustomItems`] owns the published definition store, the native catalog,
//! the placed-block tracker and its edit queue. Every call works against one
//! store snapshot, so a concurrent [`CustomItems::reload`] is never seen
//! halfway through an operation.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use customitems_assets::{definitions_from_file, natives_from_file, register_all, LoadReport};
use customitems_core::{
    BlockHost, BlockLocation, Codec, DefinitionStore, Durability, GenericItem, ItemDefinition,
    ItemInstance, ItemResolver, NamespaceAliases, NativeCatalog, NativeRegistry, SharedStore,
};
use customitems_world::{
    ActionDispatch, AppliedEdit, BlockEditQueue, BlockEditSender, BlockMineEvent, PlaceOutcome,
    PlacedBlocks, RemoveOutcome,
};
use rand::Rng;
use tracing::{debug, info};

use crate::config::EngineConfig;

/// Result of breaking a custom block on someone's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakResult {
    /// False when the break was cancelled (and not overridden).
    pub broken: bool,
    /// What the block would have dropped. Empty when not broken.
    pub drops: Vec<ItemInstance>,
}

/// Custom item engine facade.
pub struct CustomItems {
    store: SharedStore,
    catalog: Box<dyn NativeCatalog + Send + Sync>,
    aliases: NamespaceAliases,
    blocks: PlacedBlocks,
    edits: BlockEditQueue,
}

impl CustomItems {
    /// Engine over an already-populated store and catalog.
    pub fn new(store: DefinitionStore, catalog: impl NativeCatalog + Send + Sync + 'static) -> Self {
        Self {
            store: SharedStore::new(store),
            catalog: Box::new(catalog),
            aliases: NamespaceAliases::default(),
            blocks: PlacedBlocks::new(),
            edits: BlockEditQueue::new(),
        }
    }

    /// Replace the recognized namespace prefixes.
    pub fn with_aliases(mut self, aliases: NamespaceAliases) -> Self {
        self.aliases = aliases;
        self
    }

    /// Build an engine from the packs named in `config`.
    ///
    /// Fails when a pack can't be read or parsed, when no valid definition
    /// loads at all, or in strict mode when any entry was rejected.
    pub fn load(config: &EngineConfig) -> Result<(Self, LoadReport)> {
        let (store, report) = load_store(config)?;
        let catalog = match &config.natives {
            Some(path) => natives_from_file(path)
                .with_context(|| format!("Failed to load native catalog {}", path.display()))?,
            None => NativeRegistry::default(),
        };
        let engine = Self::new(store, catalog).with_aliases(config.aliases());
        Ok((engine, report))
    }

    /// Re-read the definition pack and publish it, keeping placed blocks.
    pub fn reload_from(&self, config: &EngineConfig) -> Result<LoadReport> {
        let (store, report) = load_store(config)?;
        self.reload(store);
        Ok(report)
    }

    /// Publish a new definition store, returning the previous one.
    pub fn reload(&self, store: DefinitionStore) -> Arc<DefinitionStore> {
        let previous = self.store.replace(store);
        info!(previous = previous.len(), "Reloaded custom item definitions");
        previous
    }

    /// The currently published store.
    pub fn snapshot(&self) -> Arc<DefinitionStore> {
        self.store.snapshot()
    }

    /// The native catalog.
    pub fn catalog(&self) -> &dyn NativeCatalog {
        self.catalog.as_ref()
    }

    /// Placed custom blocks.
    pub fn blocks(&self) -> &PlacedBlocks {
        &self.blocks
    }

    /// Replace the placed-block map, e.g. with one restored from a world save.
    pub fn restore_blocks(&mut self, blocks: PlacedBlocks) {
        debug!(blocks = blocks.len(), "Restored placed custom blocks");
        self.blocks = blocks;
    }

    fn codec<'a>(&'a self, store: &'a DefinitionStore) -> Codec<'a> {
        Codec::new(store)
            .with_catalog(self.catalog.as_ref())
            .with_aliases(&self.aliases)
    }

    /// Id of the custom item an instance holds.
    pub fn custom_item_id(&self, item: &ItemInstance) -> Option<String> {
        let store = self.snapshot();
        self.codec(&store).decode_id(item)
    }

    /// A fresh instance of the custom item `id`, or `None` if unknown.
    pub fn custom_item(&self, id: &str, amount: u32, case_sensitive: bool) -> Option<ItemInstance> {
        let store = self.snapshot();
        let codec = self.codec(&store);
        codec
            .lookup(id, case_sensitive)
            .map(|def| codec.encode(def, amount))
    }

    /// The definition behind `id`.
    pub fn definition(&self, id: &str, case_sensitive: bool) -> Option<Arc<ItemDefinition>> {
        let store = self.snapshot();
        self.codec(&store).lookup(id, case_sensitive).cloned()
    }

    /// Ids of every valid custom item, in registration order.
    pub fn list_custom_item_ids(&self) -> Vec<String> {
        self.snapshot().list_all_ids()
    }

    /// Ids of every valid placeable custom item, in registration order.
    pub fn list_block_custom_item_ids(&self) -> Vec<String> {
        self.snapshot().list_placeable_ids()
    }

    /// Id of the custom block at `location`.
    pub fn custom_item_id_at(&self, location: &BlockLocation) -> Option<String> {
        let store = self.snapshot();
        self.blocks
            .get(location, &store)
            .map(|def| def.id().to_string())
    }

    /// Place the custom item `id` at `location`. `None` when `id` is unknown.
    pub fn set_custom_item_at(
        &mut self,
        location: &BlockLocation,
        id: &str,
        update: bool,
        case_sensitive: bool,
        host: &mut dyn BlockHost,
    ) -> Option<PlaceOutcome> {
        let store = self.snapshot();
        let definition = Arc::clone(self.codec(&store).lookup(id, case_sensitive)?);
        Some(self.blocks.place(location, &definition, update, host))
    }

    /// Remove the custom block at `location` without computing drops.
    pub fn break_custom_item_at(
        &mut self,
        location: &BlockLocation,
        update: bool,
        host: &mut dyn BlockHost,
    ) -> RemoveOutcome {
        self.blocks.remove(location, update, host)
    }

    /// Break the custom block at `location` and hand back its drops instead
    /// of spawning them.
    ///
    /// `None` when the location holds no custom block. When the tool
    /// requirement cancels the break, nothing changes unless `force` is set.
    pub fn break_block_without_drops<R: Rng + ?Sized>(
        &mut self,
        location: &BlockLocation,
        tool: Option<ItemInstance>,
        update: bool,
        force: bool,
        host: &mut dyn BlockHost,
        rng: &mut R,
    ) -> Option<BreakResult> {
        let store = self.snapshot();
        let definition = Arc::clone(self.blocks.get(location, &store)?);

        let drops = {
            let dispatch = ActionDispatch::new(ItemResolver::new(self.codec(&store), self.catalog()));
            let mut event = BlockMineEvent::new(location.clone(), tool);
            let drops = dispatch.handle_block_mine_returning_drops(
                &mut event,
                &GenericItem::custom(definition),
                rng,
            );
            if event.cancelled && !force {
                debug!(%location, "Custom block break cancelled");
                return Some(BreakResult {
                    broken: false,
                    drops: Vec::new(),
                });
            }
            drops
        };

        self.blocks.remove(location, update, host);
        Some(BreakResult {
            broken: true,
            drops,
        })
    }

    /// Whether an instance is a custom item.
    pub fn is_custom_item(&self, item: &ItemInstance) -> bool {
        let store = self.snapshot();
        self.codec(&store).decode(item).is_some()
    }

    /// Whether an instance is the custom item `id`.
    pub fn is_custom_item_id(&self, item: &ItemInstance, id: &str, case_sensitive: bool) -> bool {
        let store = self.snapshot();
        self.codec(&store).matches_id(item, id, case_sensitive)
    }

    /// Damage on a custom item (`0` is unused).
    pub fn custom_item_damage(&self, item: &ItemInstance) -> Option<u32> {
        let store = self.snapshot();
        Durability::new(self.codec(&store)).get_damage(item)
    }

    /// Damage at which a custom item breaks.
    pub fn custom_item_max_damage(&self, item: &ItemInstance) -> Option<u32> {
        let store = self.snapshot();
        Durability::new(self.codec(&store)).get_max_damage(item)
    }

    /// Set the damage on a custom item.
    ///
    /// `None` when the instance is not custom. A custom item without
    /// durability comes back unchanged; a broken one comes back as
    /// [`ItemInstance::empty`].
    pub fn set_custom_item_damage(&self, item: &ItemInstance, amount: i64) -> Option<ItemInstance> {
        let store = self.snapshot();
        let codec = self.codec(&store);
        codec.decode(item)?;
        match Durability::new(codec).set_damage(item, amount) {
            (true, Some(damaged)) => Some(damaged),
            (true, None) => Some(ItemInstance::empty()),
            (false, _) => Some(item.clone()),
        }
    }

    /// Display name of the custom item `id`.
    pub fn friendly_name(&self, id: &str, case_sensitive: bool) -> Option<String> {
        self.definition(id, case_sensitive)
            .map(|def| def.name().to_string())
    }

    /// Resolve `id` to a custom or native item.
    pub fn generic_item(&self, id: &str, case_sensitive: bool) -> GenericItem {
        let store = self.snapshot();
        ItemResolver::new(self.codec(&store), self.catalog()).resolve(id, case_sensitive)
    }

    /// Build `amount` of whatever `id` resolves to.
    pub fn generic_instance(&self, id: &str, amount: u32, case_sensitive: bool) -> Option<ItemInstance> {
        let store = self.snapshot();
        let codec = self.codec(&store);
        ItemResolver::new(codec, self.catalog())
            .resolve(id, case_sensitive)
            .to_instance(&codec, amount)
    }

    /// Re-encode an instance whose definition changed version.
    pub fn refresh_item(&self, item: &ItemInstance) -> Option<ItemInstance> {
        let store = self.snapshot();
        self.codec(&store).refresh(item)
    }

    /// Producer handle for block edits from other threads.
    pub fn edit_sender(&self) -> BlockEditSender {
        self.edits.sender()
    }

    /// Apply queued block edits. Call from the thread that owns the engine.
    pub fn apply_pending_edits(&mut self, host: &mut dyn BlockHost) -> Vec<AppliedEdit> {
        let store = self.snapshot();
        let codec = Codec::new(&store)
            .with_catalog(self.catalog.as_ref())
            .with_aliases(&self.aliases);
        self.edits.drain_into(&mut self.blocks, &codec, host)
    }
}

fn load_store(config: &EngineConfig) -> Result<(DefinitionStore, LoadReport)> {
    let configs = definitions_from_file(&config.definitions).with_context(|| {
        format!(
            "Failed to load custom item definitions {}",
            config.definitions.display()
        )
    })?;

    let mut store = DefinitionStore::new();
    let report = register_all(&mut store, configs);
    if report.registered == 0 {
        bail!(
            "No valid custom items in {}",
            config.definitions.display()
        );
    }
    if config.strict && !report.is_clean() {
        bail!(
            "Strict loading rejected {} invalid and {} duplicate definitions",
            report.invalid.len(),
            report.duplicates.len()
        );
    }
    Ok((store, report))
}
