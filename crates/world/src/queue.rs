//! Single-writer edit queue for the block tracker.
//!
//! Producers on other threads hold a [`BlockEditSender`]; the game thread
//! owns the [`BlockEditQueue`] and applies everything pending once per tick.

use std::sync::mpsc::{self, Receiver, Sender};

use customitems_core::{BlockHost, BlockLocation, Codec};
use tracing::{debug, warn};

use crate::blocks::{PlaceOutcome, PlacedBlocks, RemoveOutcome};

/// A deferred tracker mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEdit {
    /// Place the custom item `id` at `location`.
    Place {
        /// Target location.
        location: BlockLocation,
        /// Custom item id, resolved against the store when applied.
        id: String,
        /// Host update flag.
        update: bool,
    },
    /// Remove whatever custom block is at `location`.
    Remove {
        /// Target location.
        location: BlockLocation,
        /// Host update flag.
        update: bool,
    },
}

/// Outcome of one applied edit, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedEdit {
    /// Result of a placement.
    Place(PlaceOutcome),
    /// Result of a removal.
    Remove(RemoveOutcome),
}

/// Cloneable producer handle.
#[derive(Debug, Clone)]
pub struct BlockEditSender {
    tx: Sender<BlockEdit>,
}

impl BlockEditSender {
    /// Queue an edit. Returns false once the queue has been dropped.
    pub fn send(&self, edit: BlockEdit) -> bool {
        self.tx.send(edit).is_ok()
    }

    /// Queue a placement.
    pub fn place(&self, location: BlockLocation, id: impl Into<String>, update: bool) -> bool {
        self.send(BlockEdit::Place {
            location,
            id: id.into(),
            update,
        })
    }

    /// Queue a removal.
    pub fn remove(&self, location: BlockLocation, update: bool) -> bool {
        self.send(BlockEdit::Remove { location, update })
    }
}

/// Receiving end, owned by the thread that owns the tracker.
#[derive(Debug)]
pub struct BlockEditQueue {
    tx: Sender<BlockEdit>,
    rx: Receiver<BlockEdit>,
}

impl Default for BlockEditQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockEditQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// A new producer handle.
    pub fn sender(&self) -> BlockEditSender {
        BlockEditSender {
            tx: self.tx.clone(),
        }
    }

    /// Apply every pending edit in submission order without blocking.
    ///
    /// Placement ids resolve through `codec`, so namespace-qualified ids are
    /// accepted exactly as in a direct placement.
    pub fn drain_into(
        &self,
        tracker: &mut PlacedBlocks,
        codec: &Codec<'_>,
        host: &mut dyn BlockHost,
    ) -> Vec<AppliedEdit> {
        let mut applied = Vec::new();
        for edit in self.rx.try_iter() {
            let outcome = match edit {
                BlockEdit::Place {
                    location,
                    id,
                    update,
                } => match codec.lookup(&id, false) {
                    Some(definition) => {
                        AppliedEdit::Place(tracker.place(&location, definition, update, &mut *host))
                    }
                    None => {
                        warn!(id = %id, %location, "Queued placement names an unknown custom item");
                        AppliedEdit::Place(PlaceOutcome::Rejected)
                    }
                },
                BlockEdit::Remove { location, update } => {
                    AppliedEdit::Remove(tracker.remove(&location, update, &mut *host))
                }
            };
            applied.push(outcome);
        }
        if !applied.is_empty() {
            debug!(edits = applied.len(), "Applied queued block edits");
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use customitems_core::{DefinitionConfig, DefinitionStore, NamespaceAliases};
    use customitems_testkit::RecordingHost;
    use std::thread;

    fn store() -> DefinitionStore {
        let mut store = DefinitionStore::new();
        store.register(DefinitionConfig {
            placeable: true,
            block_material: Some("mushroom_stem".into()),
            ..DefinitionConfig::new("ruby_ore", "Ruby Ore", "emerald_ore")
        });
        store
    }

    #[test]
    fn test_edits_apply_in_submission_order() {
        let store = store();
        let queue = BlockEditQueue::new();
        let sender = queue.sender();
        let here = BlockLocation::new("world", 0, 10, 0);

        assert!(sender.place(here.clone(), "ruby_ore", true));
        assert!(sender.remove(here.clone(), true));
        assert!(sender.remove(here.clone(), true));

        let mut tracker = PlacedBlocks::new();
        let mut host = RecordingHost::default();
        let applied = queue.drain_into(&mut tracker, &Codec::new(&store), &mut host);

        assert_eq!(
            applied,
            vec![
                AppliedEdit::Place(PlaceOutcome::Placed(here.clone())),
                AppliedEdit::Remove(RemoveOutcome::Removed(here.clone())),
                AppliedEdit::Remove(RemoveOutcome::NotTracked),
            ]
        );
        assert!(tracker.is_empty());
        assert!(queue.drain_into(&mut tracker, &Codec::new(&store), &mut host).is_empty());
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let store = store();
        let queue = BlockEditQueue::new();
        queue.sender().place(BlockLocation::new("world", 1, 1, 1), "nope", false);

        let mut tracker = PlacedBlocks::new();
        let mut host = RecordingHost::default();
        let applied = queue.drain_into(&mut tracker, &Codec::new(&store), &mut host);
        assert_eq!(applied, vec![AppliedEdit::Place(PlaceOutcome::Rejected)]);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_namespaced_ids_follow_codec_aliases() {
        let store = store();
        let queue = BlockEditQueue::new();
        let sender = queue.sender();
        let a = BlockLocation::new("world", 2, 2, 2);
        let b = BlockLocation::new("world", 3, 3, 3);
        sender.place(a.clone(), "cui:Ruby_Ore", false);
        sender.place(b.clone(), "ores:ruby_ore", false);

        let mut tracker = PlacedBlocks::new();
        let mut host = RecordingHost::default();
        let applied = queue.drain_into(&mut tracker, &Codec::new(&store), &mut host);
        assert_eq!(
            applied,
            vec![
                AppliedEdit::Place(PlaceOutcome::Placed(a.clone())),
                AppliedEdit::Place(PlaceOutcome::Rejected),
            ]
        );

        let aliases = NamespaceAliases::new(["ores"]);
        sender.place(b.clone(), "ores:ruby_ore", false);
        let applied = queue.drain_into(
            &mut tracker,
            &Codec::new(&store).with_aliases(&aliases),
            &mut host,
        );
        assert_eq!(applied, vec![AppliedEdit::Place(PlaceOutcome::Placed(b))]);
        assert_eq!(tracker.get_id(&a), Some("ruby_ore"));
    }

    #[test]
    fn test_producers_on_other_threads() {
        let store = store();
        let queue = BlockEditQueue::new();

        let handles: Vec<_> = (0..4)
            .map(|x| {
                let sender = queue.sender();
                thread::spawn(move || {
                    sender.place(BlockLocation::new("world", x, 0, 0), "ruby_ore", false)
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        let mut tracker = PlacedBlocks::new();
        let mut host = RecordingHost::default();
        queue.drain_into(&mut tracker, &Codec::new(&store), &mut host);
        assert_eq!(tracker.len(), 4);
    }
}
