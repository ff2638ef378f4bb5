//! Forwarding tree of hubs
//!
//! Run with: cargo run --example tree [LAYERS] [FANOUT]
//!
//! Builds a tree where every node owns its own hub, and relays messages
//! between each parent/child pair in both directions:
//!
//! ```text
//!          0
//!        /   \
//!       1     2
//!      / \   / \
//!     3   4 5   6
//! ```
//!
//! A message flooded on the rightmost leaf travels up to the root and back
//! down to the leftmost leaf. Each relay floods with the id of the node it
//! came from, so nothing is ever echoed back along the edge it arrived on.

use std::sync::Arc;
use std::time::Duration;

use bytehub::{channel, Hub, HubError, SubscriberId};

/// Id used by the observer on the leftmost leaf and by the injected message
const OBSERVER: SubscriberId = -1;

struct Node {
    id: SubscriberId,
    hub: Arc<Hub>,
}

/// Largest tree the demo will build; every node spawns two relay tasks
const MAX_NODES: i64 = 100_000;

/// Number of nodes in a full tree with `layers` levels, `None` on overflow
fn total_nodes(layers: u32, fanout: i64) -> Option<i64> {
    Some((fanout.checked_pow(layers)? - 1) / (fanout - 1))
}

/// Validate tree dimensions and return the total node count
fn tree_size(layers: u32, fanout: i64) -> Result<i64, String> {
    match total_nodes(layers, fanout) {
        Some(total) if total <= MAX_NODES => Ok(total),
        _ => Err(format!(
            "tree with {} layers and fanout {} exceeds {} nodes",
            layers, fanout, MAX_NODES
        )),
    }
}

/// Forward everything flooded on `from`'s hub into `to`'s hub
///
/// Subscribes on `from.hub` under `to.id`, so `from` never relays `to`'s own
/// traffic back to it.
fn connect(to: &Node, from: &Node) -> Result<(), HubError> {
    let (tx, mut rx) = channel(1);
    from.hub.subscribe(to.id, tx)?;

    let (to_id, from_id) = (to.id, from.id);
    let target = Arc::clone(&to.hub);

    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            tracing::debug!(from = from_id, to = to_id, "Forwarding");
            let skipped = target.flood(from_id, msg);
            if skipped > 0 {
                tracing::warn!(from = from_id, to = to_id, skipped = skipped, "Relay dropped message");
            }
        }
    });

    Ok(())
}

/// Build the tree and return it split into layers
fn build_tree(layers: u32, fanout: i64) -> Result<Vec<Vec<Node>>, Box<dyn std::error::Error>> {
    let total = tree_size(layers, fanout)?;
    let nodes: Vec<Node> = (0..total)
        .map(|id| Node {
            id,
            hub: Arc::new(Hub::new()),
        })
        .collect();

    for child in nodes.iter().skip(1) {
        let parent = &nodes[((child.id - 1) / fanout) as usize];
        connect(parent, child)?;
        connect(child, parent)?;
    }

    let mut remaining = nodes.into_iter();
    let mut start = 0;
    let tree: Vec<Vec<Node>> = (1..=layers)
        .map(|layer| {
            // Layer sizes are bounded by `total`, which already fit
            let end = total_nodes(layer, fanout).unwrap_or(total);
            let width = end - start;
            start = end;
            remaining.by_ref().take(width as usize).collect()
        })
        .collect();

    Ok(tree)
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    args.get(index)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bytehub=info".parse()?)
                .add_directive("tree=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let layers: u32 = parse_arg(&args, 1, 4).max(2);
    let fanout: i64 = parse_arg(&args, 2, 4).max(2);

    let tree = build_tree(layers, fanout)?;
    let edge = tree.last().ok_or("tree has no layers")?;
    let (left, right) = match (edge.first(), edge.last()) {
        (Some(left), Some(right)) => (left, right),
        _ => return Err("tree has an empty layer".into()),
    };

    tracing::info!(
        layers = layers,
        fanout = fanout,
        from = right.id,
        to = left.id,
        "Sending message across the tree"
    );

    let (tx, mut rx) = channel(1);
    left.hub.subscribe(OBSERVER, tx)?;

    right.hub.flood(OBSERVER, "Hello, World!");

    match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
        Ok(Some(msg)) => println!("{}", String::from_utf8_lossy(&msg)),
        Ok(None) => return Err("observer channel closed".into()),
        Err(_) => return Err("message did not cross the tree".into()),
    }

    Ok(())
}
