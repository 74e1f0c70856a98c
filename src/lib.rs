//! A minimal, thread-safe consistent hash ring
//! Nodes are identified by name and placed on a 32 bit circle through a fixed number of replica positions
//! Keys are hashed onto the same circle and owned by the first position at or after their hash, wrapping around to the first position
//!
//! Adding or removing a node only remaps the keys owned by that node's positions
//! All operations take `&self`, the ring guards its state internally and can be shared through an `Arc`
//!
//! ```
//! use consistent_hashring::HashRing;
//!
//! let ring = HashRing::new(8).unwrap();
//! ring.add_node("node1");
//! ring.add_node("node2");
//!
//! let owner = ring.get_node("some key").unwrap();
//! assert!(owner == "node1" || owner == "node2");
//! ```

#[cfg(feature = "derive")]
use serde::{Deserialize, Serialize};

pub mod hasher;
mod hashring;

pub use hasher::{Crc32, KeyHasher, SipBuildHasher};
pub use hashring::HashRing;
pub use hashring::iterator::HashRingIterator;
pub use hashring::ranges::Ownership;

/// number of replica positions per node used by `RingConfig::default()`
pub const DEFAULT_REPLICAS: usize = 8;

/// construction time settings of a `HashRing`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "derive", derive(Serialize, Deserialize))]
pub struct RingConfig {
    pub replicas: usize, // number of positions to place on the ring per node
}

impl RingConfig {
    pub fn new(replicas: usize) -> RingConfig {
        RingConfig { replicas }
    }

    /// a ring without positions per node could never own a key
    pub fn validate(&self) -> Result<()> {
        if self.replicas == 0 {
            return Err(Error::ZeroReplicas);
        }
        Ok(())
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig {
            replicas: DEFAULT_REPLICAS,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("replica count must be at least 1")]
    ZeroReplicas,
}

pub type Result<T> = std::result::Result<T, Error>;
