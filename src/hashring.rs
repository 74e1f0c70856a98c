use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::hasher::{Crc32, KeyHasher};
use crate::{Result, RingConfig};

mod crud;
pub(crate) mod iterator;
pub(crate) mod ranges;

// Placement holds the two views of the ring that have to change together:
// `table` resolves a position to its node, `sorted` is the circle in ascending order.
// Both always contain the same set of positions.
#[derive(Clone, Debug, Default, PartialEq)]
struct Placement {
    table: HashMap<u32, String>,
    sorted: Vec<u32>,
}

impl Placement {
    // first index whose position is >= hash, wrapping around to 0 past the last position
    fn search(&self, hash: u32) -> usize {
        let idx = self.sorted.partition_point(|position| *position < hash);

        if idx < self.sorted.len() { idx } else { 0 }
    }

    fn owner(&self, hash: u32) -> Option<(u32, &str)> {
        if self.sorted.is_empty() {
            return None;
        }

        let position = self.sorted[self.search(hash)];
        self.table.get(&position).map(|node| (position, node.as_str()))
    }
}

/// HashRing represents a set of named nodes sharing one key space through consistent hashing
/// HashRing places every node `replicas` times on a circle of `u32` positions
/// HashRing resolves a key to the node owning the first position at or after the key's hash
///
/// All methods take `&self`. Mutations hold an exclusive guard over the whole placement,
/// lookups a shared one, so readers never observe a half applied `add_node` or `remove_node`.
pub struct HashRing<S = Crc32> {
    hash_builder: S,
    replicas: usize,
    state: RwLock<Placement>,
}

impl Default for HashRing {
    fn default() -> Self {
        HashRing {
            hash_builder: Crc32,
            replicas: crate::DEFAULT_REPLICAS,
            state: RwLock::default(),
        }
    }
}

/// Hash Ring
///
/// A hash ring that provides consistent hashing for nodes that are added to it.
impl HashRing {
    /// Create a new `HashRing` hashing with CRC-32.
    ///
    /// # Arguments
    ///
    /// * `replicas` - number of positions each node occupies on the ring (higher number means more even distribution of keys across all nodes, but bigger lookup tables). Must be at least 1
    ///
    /// # Examples
    ///
    /// ```
    /// use consistent_hashring::{Error, HashRing};
    ///
    /// let ring = HashRing::new(8).unwrap();
    /// assert_eq!(ring.replicas(), 8);
    ///
    /// assert!(matches!(HashRing::new(0), Err(Error::ZeroReplicas)));
    /// ```
    pub fn new(replicas: usize) -> Result<HashRing> {
        HashRing::with_hasher(replicas, Crc32)
    }

    /// Create a new `HashRing` from a validated `RingConfig`.
    pub fn from_config(config: &RingConfig) -> Result<HashRing> {
        HashRing::new(config.replicas)
    }
}

impl<S> HashRing<S> {
    /// Creates an empty `HashRing` which will use the given hasher to place nodes and keys.
    ///
    /// # Arguments
    ///
    /// * `replicas` - number of positions each node occupies on the ring. Must be at least 1
    /// * `hash_builder` - implementation of `KeyHasher` mapping node replicas and keys onto the ring
    ///
    /// # Examples
    ///
    /// ```
    /// use consistent_hashring::{HashRing, SipBuildHasher};
    ///
    /// let hash_builder = SipBuildHasher::new_with_keys(0x5eed, 0xcafe);
    /// let ring = HashRing::with_hasher(16, hash_builder).unwrap();
    /// ring.add_node("node1");
    ///
    /// assert_eq!(ring.vlen(), 16);
    /// assert_eq!(ring.get_node("foo").as_deref(), Some("node1"));
    /// ```
    pub fn with_hasher(replicas: usize, hash_builder: S) -> Result<HashRing<S>> {
        RingConfig::new(replicas).validate()?;

        Ok(HashRing {
            hash_builder,
            replicas,
            state: RwLock::default(),
        })
    }

    /// Number of positions every node occupies, fixed for the lifetime of the ring.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Get the number of distinct nodes in the hash ring.
    ///
    /// Collects the owners of all positions, costs O(P log P) for P positions.
    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    /// All distinct nodes of the ring in ascending order.
    pub fn nodes(&self) -> Vec<String> {
        let state = self.read();
        let mut nodes: Vec<String> = state.table.values().cloned().collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Get the number of positions (virtual nodes) in the hash ring.
    pub fn vlen(&self) -> usize {
        self.read().sorted.len()
    }

    /// Returns true if the ring has no positions.
    pub fn is_empty(&self) -> bool {
        self.read().sorted.is_empty()
    }

    // a panic never happens while a guard is held, so a poisoned lock still protects a consistent placement
    fn read(&self) -> RwLockReadGuard<'_, Placement> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Placement> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn into_placement(self) -> Placement {
        self.state.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: KeyHasher> HashRing<S> {
    /// Hash `input` onto the ring with the ring's hasher.
    pub fn hash_key(&self, input: &[u8]) -> u32 {
        self.hash_builder.hash_key(input)
    }

    // positions of replicas `0..replicas` of `node`, derived from the node name followed by the replica index
    fn replica_positions<'a>(&'a self, node: &'a str) -> impl Iterator<Item = u32> + 'a {
        (0..self.replicas).map(move |id| self.hash_key(format!("{node}{id}").as_bytes()))
    }
}

impl<S: Clone> Clone for HashRing<S> {
    fn clone(&self) -> Self {
        HashRing {
            hash_builder: self.hash_builder.clone(),
            replicas: self.replicas,
            state: RwLock::new(self.read().clone()),
        }
    }
}

impl<S: PartialEq> PartialEq for HashRing<S> {
    fn eq(&self, other: &HashRing<S>) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        if self.hash_builder != other.hash_builder || self.replicas != other.replicas {
            return false;
        }

        // never hold both guards at once, two rings compared in opposite order could deadlock
        let placement = self.read().clone();
        placement == *other.read()
    }
}

impl<S: Debug> Debug for HashRing<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("HashRing")
            .field("hash_builder", &self.hash_builder)
            .field("replicas", &self.replicas)
            .field("positions", &state.sorted.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::{HashRing, Placement};
    use crate::hasher::SipBuildHasher;

    fn placement(entries: &[(u32, &str)]) -> Placement {
        let mut placement = Placement::default();
        for (position, node) in entries {
            placement.table.insert(*position, node.to_string());
            placement.sorted.push(*position);
        }
        placement.sorted.sort_unstable();
        placement
    }

    #[test]
    fn search_finds_lower_bound() {
        let placement = placement(&[(10, "A"), (50, "B"), (90, "C")]);

        assert_eq!(placement.search(0), 0);
        assert_eq!(placement.search(10), 0, "equal hash belongs to that position");
        assert_eq!(placement.search(11), 1);
        assert_eq!(placement.search(50), 1);
        assert_eq!(placement.search(51), 2);
        assert_eq!(placement.search(90), 2);
    }

    #[test]
    fn search_wraps_around_past_the_last_position() {
        let placement = placement(&[(10, "A"), (50, "B"), (90, "C")]);

        assert_eq!(placement.search(91), 0);
        assert_eq!(placement.search(u32::MAX), 0);
        assert_eq!(placement.owner(95), Some((10, "A")));
    }

    #[test]
    fn search_on_a_single_position() {
        let placement = placement(&[(u32::MAX, "A")]);

        assert_eq!(placement.search(0), 0);
        assert_eq!(placement.search(u32::MAX), 0);
        assert_eq!(placement.owner(7), Some((u32::MAX, "A")));
    }

    #[test]
    fn empty_placement_has_no_owner() {
        assert_eq!(Placement::default().owner(42), None);
    }

    #[test]
    fn default_ring() {
        let ring = HashRing::default();
        assert_eq!(ring.replicas(), crate::DEFAULT_REPLICAS);
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.vlen(), 0);
    }

    #[test]
    fn hash_ring_eq() {
        let ring = HashRing::new(4).unwrap();
        let other = ring.clone();
        assert_eq!(ring, other);

        other.add_node("node1");
        other.add_node("node2");
        assert_ne!(ring, other);
        assert_eq!(other.len(), 2);

        other.remove_node("node1");
        other.remove_node("node2");
        assert_eq!(ring, other);

        ring.add_node("node1");
        ring.add_node("node2");
        ring.remove_node("node1");

        other.add_node("node2");
        other.add_node("node3");
        other.remove_node("node3");

        assert_eq!(ring.len(), 1);
        assert_eq!(other.len(), 1);
        assert_eq!(ring, other);
    }

    #[test]
    fn comparing_rings_in_both_directions_while_they_change() {
        let ring = HashRing::new(8).unwrap();
        let other = HashRing::new(8).unwrap();
        ring.add_node("node1");
        other.add_node("node1");

        thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..500 {
                    ring.add_node("node2");
                    ring.remove_node("node2");
                }
            });
            s.spawn(|| {
                for _ in 0..500 {
                    other.add_node("node3");
                    other.remove_node("node3");
                }
            });
            s.spawn(|| {
                for _ in 0..500 {
                    let _ = ring == other;
                }
            });
            s.spawn(|| {
                for _ in 0..500 {
                    let _ = other == ring;
                }
            });
        });

        assert_eq!(ring, other);
    }

    #[test]
    fn len_counts_distinct_nodes() {
        let ring = HashRing::new(8).unwrap();
        ring.batch_add(["node1", "node2", "node1"]);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.len(), ring.nodes().len());
        assert_eq!(ring.vlen(), 16);
    }

    #[test]
    fn rings_with_different_hashers_differ() {
        let ring = HashRing::with_hasher(4, SipBuildHasher::new_with_keys(1, 1)).unwrap();
        let other = HashRing::with_hasher(4, SipBuildHasher::new_with_keys(2, 2)).unwrap();
        assert_ne!(ring, other);
    }

    #[test]
    fn debug_reports_position_count() {
        let ring = HashRing::new(3).unwrap();
        ring.add_node("node1");
        assert_eq!(
            format!("{ring:?}"),
            "HashRing { hash_builder: Crc32, replicas: 3, positions: 3 }"
        );
    }
}
