use std::collections::BTreeMap;
use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use super::{HashRing, Placement};
use crate::hasher::KeyHasher;

impl<S> HashRing<S>
where
    S: KeyHasher,
{
    /// Add `node` to the hash ring.
    ///
    /// Adding a node that is already part of the ring leaves the ring unchanged.
    pub fn add_node(&self, node: &str) {
        let mut state = self.write();
        self.add_positions(&mut state, node);
        state.sorted.sort_unstable();

        debug!(node, positions = state.sorted.len(), "added node");
    }

    /// Add all `nodes` to the hash ring at once, readers see either none or all of them.
    pub fn batch_add<I, N>(&self, nodes: I)
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut state = self.write();
        for node in nodes {
            self.add_positions(&mut state, node.as_ref());
        }
        state.sorted.sort_unstable();

        debug!(positions = state.sorted.len(), "added nodes");
    }

    // places the replicas of `node`, leaving `sorted` unordered
    fn add_positions(&self, state: &mut Placement, node: &str) {
        for position in self.replica_positions(node) {
            match state.table.entry(position) {
                Entry::Vacant(entry) => {
                    entry.insert(node.to_string());
                    state.sorted.push(position);
                }
                Entry::Occupied(entry) if entry.get() == node => (),
                Entry::Occupied(entry) => {
                    warn!(
                        position,
                        node,
                        owner = entry.get().as_str(),
                        "position already taken, skipping replica"
                    );
                }
            }
        }
    }

    /// Remove `node` from the hash ring.
    ///
    /// Removing a node that is not part of the ring is a no-op.
    pub fn remove_node(&self, node: &str) {
        let mut state = self.write();

        let mut removed = 0;
        for position in self.replica_positions(node) {
            if state
                .table
                .get(&position)
                .is_some_and(|owner| owner == node)
            {
                state.table.remove(&position);
                removed += 1;
            }
        }

        if removed > 0 {
            let Placement { table, sorted } = &mut *state;
            sorted.retain(|position| table.contains_key(position));
        }

        debug!(
            node,
            removed,
            positions = state.sorted.len(),
            "removed node"
        );
    }

    /// returns the node responsible for `key`
    /// Returns `None` if the ring is empty
    pub fn get_node<K: AsRef<[u8]>>(&self, key: K) -> Option<String> {
        let key = key.as_ref();
        let hash = self.hash_key(key);

        let state = self.read();
        let (position, node) = state.owner(hash)?;

        debug!(key = %String::from_utf8_lossy(key), hash, position, node, "resolved key");

        Some(node.to_string())
    }

    /// Returns true if `node` owns at least one position on the ring.
    pub fn contains(&self, node: &str) -> bool {
        let state = self.read();
        self.replica_positions(node).any(|position| {
            state
                .table
                .get(&position)
                .is_some_and(|owner| owner == node)
        })
    }

    /// Snapshot of all positions and the nodes owning them.
    pub fn placements(&self) -> BTreeMap<u32, String> {
        self.read()
            .table
            .iter()
            .map(|(position, node)| (*position, node.clone()))
            .collect()
    }

    /// Positions owned by `node` in ascending order.
    pub fn positions_of(&self, node: &str) -> Vec<u32> {
        let state = self.read();
        state
            .sorted
            .iter()
            .copied()
            .filter(|position| state.table.get(position).is_some_and(|owner| owner == node))
            .collect()
    }
}
