//! Ping-pong ring over a single hub
//!
//! Run with: cargo run --example ping
//!
//! Three pingers subscribe to one hub. The first is seeded with a unicast
//! message; every pinger answers each ping it receives by flooding a pong to
//! the others, then unsubscribes after `PINGS` rounds.

use std::sync::Arc;

use bytehub::{channel, Hub, SubscriberId};
use tokio::sync::Barrier;

const PINGERS: SubscriberId = 3;
const PINGS: usize = 10;

async fn pinger(id: SubscriberId, hub: Arc<Hub>, ready: Arc<Barrier>) {
    let (tx, mut rx) = channel(PINGS);
    if let Err(e) = hub.subscribe(id, tx) {
        tracing::error!(pinger = id, error = %e, "Subscribe failed");
        return;
    }
    ready.wait().await;

    for i in 0..PINGS {
        let Some(ping) = rx.recv().await else {
            break;
        };
        tracing::info!(
            pinger = id,
            ping = %String::from_utf8_lossy(&ping),
            "Received ping, sending pong"
        );

        let pong = format!("ping #{} from {}", i, id);
        let skipped = hub.flood(id, pong);
        if skipped != 0 {
            tracing::warn!(pinger = id, round = i, skipped = skipped, "Skipped subscribers");
        }
    }

    hub.unsubscribe(id);
    tracing::info!(pinger = id, pings = PINGS, "Pinger done, unsubscribed");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bytehub=debug".parse()?)
                .add_directive("ping=info".parse()?),
        )
        .init();

    let hub = Arc::new(Hub::new());
    // Pingers plus main
    let ready = Arc::new(Barrier::new(PINGERS as usize + 1));

    let handles: Vec<_> = (1..=PINGERS)
        .map(|id| tokio::spawn(pinger(id, Arc::clone(&hub), Arc::clone(&ready))))
        .collect();

    // Wait for subscriptions to be made
    ready.wait().await;

    hub.send(1, "initial ping")?;

    for handle in handles {
        handle.await?;
    }

    let stats = hub.stats();
    println!(
        "delivered={} dropped={} floods={}",
        stats.delivered, stats.dropped, stats.floods
    );

    Ok(())
}
