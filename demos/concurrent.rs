//! share one HashRing between reader threads while a writer keeps changing the cluster
//! prints how many lookups every node answered

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use consistent_hashring::HashRing;
use rand::{Rng, distr::Alphanumeric};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const READERS: usize = 4;
const LOOKUPS: usize = 25_000;

fn main() -> Result<(), consistent_hashring::Error> {
    let filter = env_filter();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ring = Arc::new(HashRing::new(32)?);
    ring.batch_add(["node1", "node2", "node3", "node4"]);

    let counts = thread::scope(|s| {
        let writer = Arc::clone(&ring);
        s.spawn(move || {
            for round in 0..100 {
                let node = format!("node{}", 5 + round % 3);
                writer.add_node(&node);
                writer.remove_node(&node);
            }
        });

        let readers: Vec<_> = (0..READERS)
            .map(|_| {
                let reader = Arc::clone(&ring);
                s.spawn(move || {
                    let mut counts: HashMap<String, usize> = HashMap::new();
                    for _ in 0..LOOKUPS {
                        if let Some(node) = reader.get_node(random_string()) {
                            *counts.entry(node).or_default() += 1;
                        }
                    }
                    counts
                })
            })
            .collect();

        let mut total: HashMap<String, usize> = HashMap::new();
        for reader in readers {
            match reader.join() {
                Ok(counts) => {
                    for (node, count) in counts {
                        *total.entry(node).or_default() += count;
                    }
                }
                Err(_) => warn!("reader thread panicked, its lookups are not counted"),
            }
        }
        total
    });

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort();
    for (node, count) in counts {
        info!("{node}: {count} lookups");
    }
    info!("final members: {:?}", ring.nodes());

    Ok(())
}

fn random_string() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect()
}

// RUST_LOG if set, info otherwise
fn env_filter() -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info"),
    }
}
