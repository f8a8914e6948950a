//! Causal reads: merged world state as of a point in time

use std::collections::BTreeMap;

use crate::core::types::WorldSnapshot;
use crate::store::IntervalStore;

/// Read-only view over the store that tolerates missing history
#[derive(Debug, Clone, Copy)]
pub struct CausalReader<'a> {
    store: &'a IntervalStore<WorldSnapshot>,
}

impl<'a> CausalReader<'a> {
    pub fn new(store: &'a IntervalStore<WorldSnapshot>) -> Self {
        Self { store }
    }

    /// Merged snapshot of every record containing `point`.
    ///
    /// A point with no history reads as an empty snapshot. The result may
    /// hold any subset of agents.
    pub fn read(&self, point: f64) -> WorldSnapshot {
        let frames = self.store.query(point).unwrap_or_else(|err| {
            tracing::trace!("Empty read: {}", err);
            Vec::new()
        });
        merge_right_biased(frames)
    }
}

/// Key-wise merge where later maps overwrite earlier ones.
///
/// Records are appended in execution order, so the last entry for a key is
/// the freshest write for that key.
pub fn merge_right_biased<'m, K, V, I>(maps: I) -> BTreeMap<K, V>
where
    K: Ord + Clone + 'm,
    V: Clone + 'm,
    I: IntoIterator<Item = &'m BTreeMap<K, V>>,
{
    let mut merged = BTreeMap::new();
    for map in maps {
        for (key, value) in map {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AgentId, AgentState};
    use glam::DVec2;

    fn state(time: f64, x: f64) -> AgentState {
        AgentState::new(time, 0.1, DVec2::new(x, 0.0), DVec2::ZERO)
    }

    fn frame(id: AgentId, s: AgentState) -> WorldSnapshot {
        WorldSnapshot::from([(id, s)])
    }

    #[test]
    fn test_merge_later_wins() {
        let a = BTreeMap::from([("k", 1), ("only_a", 10)]);
        let b = BTreeMap::from([("k", 2), ("only_b", 20)]);
        let merged = merge_right_biased([&a, &b]);
        assert_eq!(merged, BTreeMap::from([("k", 2), ("only_a", 10), ("only_b", 20)]));
    }

    #[test]
    fn test_merge_empty_sequence() {
        let merged: BTreeMap<u8, u8> = merge_right_biased(Vec::<&BTreeMap<u8, u8>>::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_read_freshest_by_append_order() {
        let s1 = state(0.0, 1.0);
        let s2 = state(0.5, 2.0);
        let mut store = IntervalStore::new();
        store.append(0.0, 2.0, frame(AgentId::Planet, s1)).unwrap();
        store.append(0.5, 1.5, frame(AgentId::Planet, s2)).unwrap();

        let snapshot = CausalReader::new(&store).read(1.0);
        assert_eq!(snapshot.get(&AgentId::Planet), Some(&s2));
    }

    #[test]
    fn test_read_combines_agents() {
        let planet = state(0.0, 1.0);
        let satellite = state(0.0, 5.0);
        let mut store = IntervalStore::new();
        store.append(-10.0, 1.0, frame(AgentId::Planet, planet)).unwrap();
        store.append(-10.0, 2.0, frame(AgentId::Satellite, satellite)).unwrap();

        let reader = CausalReader::new(&store);
        assert_eq!(reader.read(0.5).len(), 2);

        // Planet's interval has ended at 1.0
        let later = reader.read(1.0);
        assert_eq!(later.len(), 1);
        assert!(later.contains_key(&AgentId::Satellite));
    }

    #[test]
    fn test_read_absorbs_missing_history() {
        let store = IntervalStore::new();
        assert!(CausalReader::new(&store).read(3.0).is_empty());
    }
}
