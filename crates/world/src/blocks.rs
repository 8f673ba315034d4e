//! Block-state tracker: which world locations hold custom item blocks.

use std::collections::BTreeMap;
use std::sync::Arc;

use customitems_core::{BlockHost, BlockLocation, DefinitionStore, ItemDefinition, AIR};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One tracked block, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBlock {
    /// Where the block sits.
    pub location: BlockLocation,
    /// Registered id of the custom item occupying it.
    pub id: String,
}

/// Result of [`PlacedBlocks::place`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The location now holds the definition.
    Placed(BlockLocation),
    /// The definition is not placeable or failed validation; nothing changed.
    Rejected,
}

/// Result of [`PlacedBlocks::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The record was dropped and the block cleared.
    Removed(BlockLocation),
    /// No custom block was tracked there; the host was not touched.
    NotTracked,
}

/// Location-keyed map of placed custom blocks.
///
/// Last write wins. Iteration is ordered by location so snapshots are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PlacedBlock>", into = "Vec<PlacedBlock>")]
pub struct PlacedBlocks {
    blocks: BTreeMap<BlockLocation, String>,
}

impl PlacedBlocks {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Definition occupying `location`, if it is still known to `store`.
    pub fn get<'s>(
        &self,
        location: &BlockLocation,
        store: &'s DefinitionStore,
    ) -> Option<&'s Arc<ItemDefinition>> {
        let id = self.blocks.get(location)?;
        store.lookup(id, false)
    }

    /// Raw id recorded at `location`.
    pub fn get_id(&self, location: &BlockLocation) -> Option<&str> {
        self.blocks.get(location).map(String::as_str)
    }

    /// Whether `location` is tracked.
    pub fn contains(&self, location: &BlockLocation) -> bool {
        self.blocks.contains_key(location)
    }

    /// Place `definition` at `location`, replacing whatever was tracked there.
    ///
    /// `update` is passed to the host as its physics/neighbour update flag.
    pub fn place(
        &mut self,
        location: &BlockLocation,
        definition: &ItemDefinition,
        update: bool,
        host: &mut dyn BlockHost,
    ) -> PlaceOutcome {
        let block_material = match definition.block_material() {
            Some(material) if definition.is_placeable() && definition.is_valid() => material,
            _ => {
                debug!(id = definition.id(), %location, "Rejected placement of non-placeable item");
                return PlaceOutcome::Rejected;
            }
        };

        host.set_block(location, block_material, update);
        if let Some(previous) = self
            .blocks
            .insert(location.clone(), definition.id().to_string())
        {
            debug!(%location, previous = %previous, id = definition.id(), "Replaced custom block");
        } else {
            debug!(%location, id = definition.id(), "Placed custom block");
        }
        PlaceOutcome::Placed(location.clone())
    }

    /// Stop tracking `location` and clear the block to air.
    pub fn remove(
        &mut self,
        location: &BlockLocation,
        update: bool,
        host: &mut dyn BlockHost,
    ) -> RemoveOutcome {
        match self.blocks.remove(location) {
            Some(id) => {
                host.set_block(location, AIR, update);
                debug!(%location, id = %id, "Removed custom block");
                RemoveOutcome::Removed(location.clone())
            }
            None => RemoveOutcome::NotTracked,
        }
    }

    /// Tracked locations in order.
    pub fn locations(&self) -> impl Iterator<Item = &BlockLocation> {
        self.blocks.keys()
    }

    /// Tracked blocks in location order.
    pub fn iter(&self) -> impl Iterator<Item = (&BlockLocation, &str)> {
        self.blocks.iter().map(|(loc, id)| (loc, id.as_str()))
    }

    /// Number of tracked blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl From<Vec<PlacedBlock>> for PlacedBlocks {
    fn from(records: Vec<PlacedBlock>) -> Self {
        Self {
            blocks: records
                .into_iter()
                .map(|record| (record.location, record.id))
                .collect(),
        }
    }
}

impl From<PlacedBlocks> for Vec<PlacedBlock> {
    fn from(tracker: PlacedBlocks) -> Self {
        tracker
            .blocks
            .into_iter()
            .map(|(location, id)| PlacedBlock { location, id })
            .collect()
    }
}
