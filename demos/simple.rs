//! basic example to showcase the main functions of HashRing
//!
//! run with `RUST_LOG=debug` to see the hash and position behind every lookup

use consistent_hashring::{HashRing, RingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const KEYS: [&str; 5] = ["newkey", "newkey2", "newkey3", "newkey4", "newkey5"];

fn main() -> Result<(), consistent_hashring::Error> {
    let filter = env_filter();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Consistent Hashing");
    let ring = HashRing::from_config(&RingConfig::new(8))?;
    ring.add_node("node1");
    ring.add_node("node2");
    ring.add_node("node3");
    info!("Available Nodes ==> {:?}", ring.placements());

    for key in KEYS {
        info!("{key} ==> {:?}", ring.get_node(key));
    }

    ring.remove_node("node2");
    info!("Available Nodes After remove ==> {:?}", ring.placements());

    for key in KEYS {
        info!("{key} ==> {:?}", ring.get_node(key));
    }

    // hash ranges each node is responsible for after node2 left
    for ownership in ring.get_hash_ranges() {
        info!("{:?} ==> {}", ownership.hash_range, ownership.node);
    }

    Ok(())
}

// RUST_LOG if set, info otherwise
fn env_filter() -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info"),
    }
}
