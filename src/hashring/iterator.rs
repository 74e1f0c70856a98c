use super::{HashRing, Placement};

/// Yields `(position, node)` pairs in ring order, starting at the lowest position
pub struct HashRingIterator {
    ring: std::vec::IntoIter<(u32, String)>,
}

impl Iterator for HashRingIterator {
    type Item = (u32, String);

    fn next(&mut self) -> Option<Self::Item> {
        self.ring.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ring.size_hint()
    }
}

impl ExactSizeIterator for HashRingIterator {}

impl<S> IntoIterator for HashRing<S> {
    type Item = (u32, String);

    type IntoIter = HashRingIterator;

    fn into_iter(self) -> Self::IntoIter {
        let Placement { mut table, sorted } = self.into_placement();

        let ring: Vec<(u32, String)> = sorted
            .into_iter()
            .filter_map(|position| table.remove(&position).map(|node| (position, node)))
            .collect();

        HashRingIterator {
            ring: ring.into_iter(),
        }
    }
}
