//! Block-mine dispatch: turn a mining event on a custom block into drops.
//!
//! Dispatch is pure over the definition rules and the event. It never
//! removes the block or touches an inventory; it only computes drops and may
//! flag the event as cancelled.

use std::sync::Arc;

use customitems_core::{
    Behavior, BlockLocation, Durability, EnchantmentType, GenericItem, ItemDefinition,
    ItemInstance, ItemKind, ItemResolver, ToolSpec,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// A player (or machine) breaking a block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMineEvent {
    /// Block being mined.
    pub location: BlockLocation,
    /// Who is mining, for logs.
    pub actor: Option<String>,
    /// Item in the miner's hand.
    pub tool: Option<ItemInstance>,
    /// Set when the break must not happen.
    pub cancelled: bool,
}

impl BlockMineEvent {
    /// Uncancelled event at `location`.
    pub fn new(location: BlockLocation, tool: Option<ItemInstance>) -> Self {
        Self {
            location,
            actor: None,
            tool,
            cancelled: false,
        }
    }

    /// Attach the miner's name.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Deterministic RNG for one block, mixed from a world seed and the location.
pub fn location_rng(world_seed: u64, location: &BlockLocation) -> StdRng {
    let world_hash = location
        .world
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        });
    let seed = world_seed
        ^ world_hash
        ^ (location.x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (location.y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (location.z as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
    StdRng::seed_from_u64(seed)
}

/// Applies custom item rules to world events.
#[derive(Clone, Copy)]
pub struct ActionDispatch<'a> {
    resolver: ItemResolver<'a>,
}

impl<'a> ActionDispatch<'a> {
    /// Dispatch over a resolver (which carries the codec and native catalog).
    pub fn new(resolver: ItemResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Compute what mining `block` yields.
    ///
    /// `block` is the item occupying the mined location. Native blocks drop
    /// themselves. A custom block whose tool requirement is not met cancels
    /// the event and drops nothing. Randomness for fortune comes from `rng`.
    pub fn handle_block_mine_returning_drops<R: Rng + ?Sized>(
        &self,
        event: &mut BlockMineEvent,
        block: &GenericItem,
        rng: &mut R,
    ) -> Vec<ItemInstance> {
        let definition = match block.kind() {
            None => return Vec::new(),
            Some(ItemKind::Native(kind)) => return vec![ItemInstance::new(kind.name.clone(), 1)],
            Some(ItemKind::Custom(definition)) => definition,
        };
        if !definition.is_valid() {
            debug!(id = definition.id(), "Ignoring mine event on invalid custom block");
            return Vec::new();
        }

        let tool = event.tool.as_ref().filter(|tool| !tool.is_empty());
        if let Some(requirement) = definition.required_tool() {
            if !requirement.is_met_by(tool.and_then(|tool| self.tool_spec(tool))) {
                debug!(
                    id = definition.id(),
                    location = %event.location,
                    actor = event.actor.as_deref().unwrap_or("-"),
                    "Tool requirement not met, cancelling break"
                );
                event.cancelled = true;
                return Vec::new();
            }
        }

        let level = |enchantment| tool.map_or(0, |tool| tool.meta.enchantment_level(enchantment));
        let codec = self.resolver.codec();

        if level(EnchantmentType::SilkTouch) > 0 && definition.has(Behavior::SILK_TOUCH_DROPS) {
            return vec![codec.encode(definition, 1)];
        }

        let mut drops = self.table_drops(definition);
        let fortune = level(EnchantmentType::Fortune);
        if fortune > 0 && definition.has(Behavior::FORTUNE_DROPS) {
            for drop in &mut drops {
                drop.amount = drop.amount.saturating_mul(fortune_multiplier(fortune, rng));
            }
        }
        drops
    }

    /// Wear down a custom tool after it broke a block.
    ///
    /// Returns `None` when the tool is not a damageable custom item. A broken
    /// tool comes back as [`ItemInstance::empty`]. Unbreaking skips the wear
    /// with probability `level / (level + 1)`.
    pub fn wear_tool<R: Rng + ?Sized>(&self, tool: &ItemInstance, rng: &mut R) -> Option<ItemInstance> {
        let durability = Durability::new(*self.resolver.codec());
        durability.get_damage(tool)?;

        let unbreaking = tool.meta.enchantment_level(EnchantmentType::Unbreaking);
        if unbreaking > 0 && rng.gen_range(0..=unbreaking) != 0 {
            return Some(tool.clone());
        }
        match durability.damage_by(tool, 1) {
            (true, Some(worn)) => Some(worn),
            (true, None) => Some(ItemInstance::empty()),
            (false, _) => None,
        }
    }

    fn tool_spec(&self, tool: &ItemInstance) -> Option<ToolSpec> {
        match self.resolver.resolve_instance(tool).kind()? {
            ItemKind::Custom(definition) => definition.tool(),
            ItemKind::Native(kind) => kind.tool,
        }
    }

    fn table_drops(&self, definition: &Arc<ItemDefinition>) -> Vec<ItemInstance> {
        let codec = self.resolver.codec();
        if definition.block_drops().is_empty() {
            return vec![codec.encode(definition, 1)];
        }

        definition
            .block_drops()
            .iter()
            .filter_map(|drop| {
                let instance = self
                    .resolver
                    .resolve(&drop.item, false)
                    .to_instance(codec, drop.amount);
                if instance.is_none() {
                    warn!(id = definition.id(), item = %drop.item, "Block drop names an unknown item");
                }
                instance
            })
            .collect()
    }
}

/// `1 + max(0, r - 1)` with `r` uniform over `0..=level + 1`.
fn fortune_multiplier<R: Rng + ?Sized>(level: u8, rng: &mut R) -> u32 {
    let roll: u32 = rng.gen_range(0..=u32::from(level) + 1);
    1 + roll.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use customitems_core::{
        BlockDrop, Codec, DefinitionConfig, DefinitionStore, Enchantment, NativeKind,
        NativeRegistry, ToolMaterial, ToolRequirement, ToolType,
    };

    fn fixtures() -> (DefinitionStore, NativeRegistry) {
        let mut store = DefinitionStore::new();
        store.register(DefinitionConfig {
            placeable: true,
            block_material: Some("mushroom_stem".into()),
            behavior: Behavior::SILK_TOUCH_DROPS | Behavior::FORTUNE_DROPS,
            required_tool: Some(ToolRequirement {
                kind: Some(ToolType::Pickaxe),
                min_tier: ToolMaterial::Iron,
            }),
            block_drops: vec![BlockDrop {
                item: "ruby".into(),
                amount: 2,
            }],
            ..DefinitionConfig::new("ruby_ore", "Ruby Ore", "emerald_ore")
        });
        store.register(DefinitionConfig {
            placeable: true,
            block_material: Some("note_block".into()),
            ..DefinitionConfig::new("speaker", "Speaker", "note_block")
        });
        store.register(DefinitionConfig::new("ruby", "Ruby", "emerald"));
        store.register(DefinitionConfig {
            damageable: true,
            max_durability: 3,
            tool: Some(ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Diamond)),
            ..DefinitionConfig::new("ruby_pick", "Ruby Pickaxe", "diamond_pickaxe")
        });

        let catalog = NativeRegistry::new(vec![
            NativeKind::simple("stone"),
            NativeKind::tool(
                "wooden_pickaxe",
                ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Wood),
                59,
            ),
            NativeKind::tool(
                "iron_pickaxe",
                ToolSpec::new(ToolType::Pickaxe, ToolMaterial::Iron),
                250,
            ),
        ]);
        (store, catalog)
    }

    fn event(tool: Option<ItemInstance>) -> BlockMineEvent {
        BlockMineEvent::new(BlockLocation::new("world", 0, 12, 0), tool).with_actor("steve")
    }

    fn enchanted(material: &str, enchantment: EnchantmentType, level: u8) -> ItemInstance {
        let mut tool = ItemInstance::new(material, 1);
        assert!(tool.add_enchantment(Enchantment::new(enchantment, level)));
        tool
    }

    #[test]
    fn test_native_block_drops_itself() {
        let (store, catalog) = fixtures();
        let resolver = ItemResolver::new(Codec::new(&store), &catalog);
        let dispatch = ActionDispatch::new(resolver);
        let mut rng = StdRng::seed_from_u64(1);

        let mut ev = event(None);
        let drops = dispatch.handle_block_mine_returning_drops(
            &mut ev,
            &resolver.resolve("stone", false),
            &mut rng,
        );
        assert_eq!(drops, vec![ItemInstance::new("stone", 1)]);
        assert!(!ev.cancelled);

        let drops = dispatch.handle_block_mine_returning_drops(
            &mut ev,
            &GenericItem::absent(),
            &mut rng,
        );
        assert!(drops.is_empty());
        assert!(!ev.cancelled);
    }

    #[test]
    fn test_tool_requirement_cancels() {
        let (store, catalog) = fixtures();
        let resolver = ItemResolver::new(Codec::new(&store), &catalog);
        let dispatch = ActionDispatch::new(resolver);
        let ore = resolver.resolve("ruby_ore", false);
        let mut rng = StdRng::seed_from_u64(1);

        for tool in [None, Some(ItemInstance::new("wooden_pickaxe", 1))] {
            let mut ev = event(tool);
            let drops = dispatch.handle_block_mine_returning_drops(&mut ev, &ore, &mut rng);
            assert!(drops.is_empty());
            assert!(ev.cancelled);
        }
    }

    #[test]
    fn test_drop_table_with_native_and_custom_tools() {
        let (store, catalog) = fixtures();
        let codec = Codec::new(&store);
        let resolver = ItemResolver::new(codec, &catalog);
        let dispatch = ActionDispatch::new(resolver);
        let ore = resolver.resolve("ruby_ore", false);
        let mut rng = StdRng::seed_from_u64(1);

        let pick = codec.encode(store.lookup("ruby_pick", false).unwrap(), 1);
        for tool in [ItemInstance::new("iron_pickaxe", 1), pick] {
            let mut ev = event(Some(tool));
            let drops = dispatch.handle_block_mine_returning_drops(&mut ev, &ore, &mut rng);
            assert!(!ev.cancelled);
            assert_eq!(drops.len(), 1);
            assert_eq!(codec.decode_id(&drops[0]).as_deref(), Some("ruby"));
            assert_eq!(drops[0].amount, 2);
        }
    }

    #[test]
    fn test_empty_table_drops_block_item() {
        let (store, catalog) = fixtures();
        let codec = Codec::new(&store);
        let resolver = ItemResolver::new(codec, &catalog);
        let dispatch = ActionDispatch::new(resolver);
        let mut rng = StdRng::seed_from_u64(1);

        let mut ev = event(None);
        let drops = dispatch.handle_block_mine_returning_drops(
            &mut ev,
            &resolver.resolve("speaker", false),
            &mut rng,
        );
        assert_eq!(drops.len(), 1);
        assert_eq!(codec.decode_id(&drops[0]).as_deref(), Some("speaker"));
    }

    #[test]
    fn test_silk_touch_drops_block_item() {
        let (store, catalog) = fixtures();
        let codec = Codec::new(&store);
        let resolver = ItemResolver::new(codec, &catalog);
        let dispatch = ActionDispatch::new(resolver);
        let mut rng = StdRng::seed_from_u64(1);

        let mut ev = event(Some(enchanted("iron_pickaxe", EnchantmentType::SilkTouch, 1)));
        let drops = dispatch.handle_block_mine_returning_drops(
            &mut ev,
            &resolver.resolve("ruby_ore", false),
            &mut rng,
        );
        assert_eq!(drops.len(), 1);
        assert_eq!(codec.decode_id(&drops[0]).as_deref(), Some("ruby_ore"));
        assert_eq!(drops[0].amount, 1);
    }

    #[test]
    fn test_fortune_scales_within_bounds() {
        let (store, catalog) = fixtures();
        let resolver = ItemResolver::new(Codec::new(&store), &catalog);
        let dispatch = ActionDispatch::new(resolver);
        let ore = resolver.resolve("ruby_ore", false);
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen_bonus = false;
        for _ in 0..200 {
            let mut ev = event(Some(enchanted("iron_pickaxe", EnchantmentType::Fortune, 3)));
            let drops = dispatch.handle_block_mine_returning_drops(&mut ev, &ore, &mut rng);
            let amount = drops[0].amount;
            // base 2, multiplier in 1..=4
            assert!(amount % 2 == 0 && (2..=8).contains(&amount), "amount {amount}");
            seen_bonus |= amount > 2;
        }
        assert!(seen_bonus);
    }

    #[test]
    fn test_invalid_definition_is_ignored() {
        let (mut store, catalog) = fixtures();
        store.register(DefinitionConfig {
            placeable: true,
            ..DefinitionConfig::new("ghost_ore", "Ghost Ore", "stone")
        });
        let resolver = ItemResolver::new(Codec::new(&store), &catalog);
        let dispatch = ActionDispatch::new(resolver);
        let ghost = GenericItem::custom(Arc::clone(store.lookup("ghost_ore", false).unwrap()));

        let mut ev = event(None);
        let drops =
            dispatch.handle_block_mine_returning_drops(&mut ev, &ghost, &mut StdRng::seed_from_u64(0));
        assert!(drops.is_empty());
        assert!(!ev.cancelled);
    }

    #[test]
    fn test_wear_tool_until_broken() {
        let (store, catalog) = fixtures();
        let codec = Codec::new(&store);
        let dispatch = ActionDispatch::new(ItemResolver::new(codec, &catalog));
        let mut rng = StdRng::seed_from_u64(7);

        let mut pick = codec.encode(store.lookup("ruby_pick", false).unwrap(), 1);
        for _ in 0..2 {
            pick = dispatch.wear_tool(&pick, &mut rng).unwrap();
            assert!(!pick.is_empty());
        }
        let broken = dispatch.wear_tool(&pick, &mut rng).unwrap();
        assert!(broken.is_empty());

        assert_eq!(dispatch.wear_tool(&ItemInstance::new("iron_pickaxe", 1), &mut rng), None);
    }

    #[test]
    fn test_location_rng_is_deterministic() {
        let here = BlockLocation::new("world", 3, 4, 5);
        let a: u64 = location_rng(99, &here).gen();
        let b: u64 = location_rng(99, &here).gen();
        let c: u64 = location_rng(99, &BlockLocation::new("world_nether", 3, 4, 5)).gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
