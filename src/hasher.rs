//! Hash functions that place nodes and keys on the 32 bit circle
//!
//! Positions need to be stable across processes, so only deterministic hashers qualify.
//! Collision resistance is not required, an even spread over `0..=u32::MAX` is.

use siphasher::sip::SipHasher;
use std::hash::{BuildHasher, Hasher};

/// Maps a byte sequence onto the ring
pub trait KeyHasher {
    fn hash_key(&self, input: &[u8]) -> u32;
}

/// CRC-32 (IEEE) checksum, the default hasher of `HashRing`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crc32;

impl KeyHasher for Crc32 {
    fn hash_key(&self, input: &[u8]) -> u32 {
        crc32fast::hash(input)
    }
}

/// SipHash-2-4 with a fixed 128 bit key
///
/// Use distinct keys to get a placement that callers cannot predict from node names alone.
/// The 64 bit digest is folded into 32 bits for ring positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SipBuildHasher {
    k0: u64,
    k1: u64,
}

impl SipBuildHasher {
    pub fn new_with_keys(k0: u64, k1: u64) -> SipBuildHasher {
        SipBuildHasher { k0, k1 }
    }
}

impl BuildHasher for SipBuildHasher {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.k0, self.k1)
    }
}

impl KeyHasher for SipBuildHasher {
    fn hash_key(&self, input: &[u8]) -> u32 {
        let mut hasher = self.build_hasher();
        hasher.write(input);
        let hash = hasher.finish();
        (hash ^ (hash >> 32)) as u32
    }
}

impl<H: KeyHasher + ?Sized> KeyHasher for &H {
    fn hash_key(&self, input: &[u8]) -> u32 {
        (**self).hash_key(input)
    }
}
