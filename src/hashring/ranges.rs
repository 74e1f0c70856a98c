use std::ops::RangeInclusive;

#[cfg(feature = "derive")]
use serde::{Deserialize, Serialize};

use super::HashRing;

/// Ownership contains a range of key hashes and the node every key within the range resolves to
///
/// * `hash_range` - inclusive range of key hashes. A node usually owns one range per position, consider all returned ranges
/// * `node` - node responsible for all keys with a hash in hash_range
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "derive", derive(Serialize, Deserialize))]
pub struct Ownership {
    pub hash_range: RangeInclusive<u32>,
    pub node: String,
}

impl Ownership {
    /// number of key hashes covered by this range
    pub fn width(&self) -> u64 {
        u64::from(*self.hash_range.end()) - u64::from(*self.hash_range.start()) + 1
    }
}

impl<S> HashRing<S> {
    /// Split the whole hash space into the ranges owned by each position, in ring order
    ///
    /// Every position owns the hashes after its predecessor up to and including itself.
    /// The first position also owns everything after the last position, so that range wraps and is returned in two pieces.
    pub fn get_hash_ranges(&self) -> Vec<Ownership> {
        let state = self.read();

        let owner = |position: &u32| state.table.get(position).cloned().unwrap_or_default();

        let (first, last) = match (state.sorted.first(), state.sorted.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return vec![],
        };

        if state.sorted.len() == 1 {
            return vec![Ownership {
                hash_range: 0..=u32::MAX,
                node: owner(&first),
            }];
        }

        let mut ranges = Vec::with_capacity(state.sorted.len() + 1);

        if last < u32::MAX {
            ranges.push(Ownership {
                hash_range: last + 1..=u32::MAX,
                node: owner(&first),
            });
        }
        ranges.push(Ownership {
            hash_range: 0..=first,
            node: owner(&first),
        });

        for pair in state.sorted.windows(2) {
            ranges.push(Ownership {
                hash_range: pair[0] + 1..=pair[1],
                node: owner(&pair[1]),
            });
        }

        ranges
    }

    /// Ranges of key hashes resolving to `node`.
    pub fn ranges_of(&self, node: &str) -> Vec<Ownership> {
        self.get_hash_ranges()
            .into_iter()
            .filter(|ownership| ownership.node == node)
            .collect()
    }
}
