//! Tests for node id generation under concurrency.

use std::sync::Arc;

use glean_core::{FxHashSet, NodeId, NodeIdGenerator, SequentialIdGenerator};
use proptest::prelude::*;
use rayon::prelude::*;

#[test]
fn test_concurrent_ids_never_collide() {
    let gen = Arc::new(SequentialIdGenerator::new());
    let batches: Vec<Vec<NodeId>> = (0..16)
        .into_par_iter()
        .map(|_| (0..500).map(|_| gen.next_id()).collect())
        .collect();

    let mut seen = FxHashSet::default();
    for batch in &batches {
        // each caller observes a strictly increasing sequence
        assert!(batch.windows(2).all(|w| w[0] < w[1]));
        for id in batch {
            assert!(seen.insert(*id), "duplicate id {id}");
        }
    }
    assert_eq!(seen.len(), 16 * 500);
    assert_eq!(gen.peek(), NodeId(16 * 500 + 1));
}

#[test]
fn test_generator_behind_trait_object() {
    let gen: Arc<dyn NodeIdGenerator> = Arc::new(SequentialIdGenerator::starting_at(100));
    assert_eq!(gen.next_id(), NodeId(100));
    assert_eq!(gen.next_id(), NodeId(101));
}

#[test]
fn test_node_id_serializes_transparently() {
    #[derive(serde::Serialize)]
    struct Wrapper {
        id: NodeId,
    }
    let text = toml::to_string(&Wrapper { id: NodeId(7) }).unwrap();
    assert_eq!(text.trim(), "id = 7");
}

proptest! {
    #[test]
    fn prop_ids_strictly_increase_from_any_start(start in 1u64..u64::MAX / 2, n in 1usize..200) {
        let gen = SequentialIdGenerator::starting_at(start);
        let ids: Vec<NodeId> = (0..n).map(|_| gen.next_id()).collect();
        prop_assert_eq!(ids[0], NodeId(start));
        prop_assert!(ids.windows(2).all(|w| w[1].get() == w[0].get() + 1));
    }
}
