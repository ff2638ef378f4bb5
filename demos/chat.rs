//! Line-based chat relay over TCP
//!
//! Run with: cargo run --example chat [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example chat                    # binds to 127.0.0.1:8080
//!   cargo run --example chat 0.0.0.0:9000       # binds to 0.0.0.0:9000
//!
//! Connect a few clients with `nc 127.0.0.1 8080` and type. Every line is
//! flooded to all other connected clients. A client that stops reading its
//! socket fills its buffer and simply misses messages; nobody else slows down.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bytehub::{Hub, HubConfig, SubscriberId};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Chat server relaying lines between connections through one hub
struct ChatServer {
    bind_addr: SocketAddr,
    hub: Arc<Hub>,
    next_id: AtomicI64,
}

impl ChatServer {
    fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            hub: Arc::new(Hub::with_config(HubConfig::default().buffer_size(256))),
            next_id: AtomicI64::new(1),
        }
    }

    async fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "Chat server listening");

        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let hub = Arc::clone(&self.hub);

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(hub, id, socket, peer_addr).await {
                            tracing::debug!(client = id, error = %e, "Connection error");
                        }
                        tracing::debug!(client = id, "Connection closed");
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

async fn handle_connection(
    hub: Arc<Hub>,
    id: SubscriberId,
    socket: TcpStream,
    peer_addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    socket.set_nodelay(true)?;

    let (outbox, mut inbox) = hub.channel();
    hub.subscribe(id, outbox)?;

    tracing::info!(client = id, peer = %peer_addr, online = hub.count(), "Client joined");

    let (reader, mut writer) = socket.into_split();

    // Ends once the hub drops the only sender on unsubscribe
    let writer_task = tokio::spawn(async move {
        while let Some(msg) = inbox.recv().await {
            if writer.write_all(&msg).await.is_err() {
                break;
            }
        }
    });

    hub.flood(id, format!("* client {} joined\n", id));

    let mut lines = BufReader::new(reader).lines();
    let result = loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let skipped = hub.flood(id, format!("[{}] {}\n", id, line));
                if skipped > 0 {
                    tracing::debug!(client = id, skipped = skipped, "Slow clients skipped");
                }
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e.into()),
        }
    };

    hub.unsubscribe(id);
    hub.flood(id, format!("* client {} left\n", id));
    tracing::info!(client = id, online = hub.count(), "Client left");

    let _ = writer_task.await;
    result
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let bind_addr: SocketAddr = match args.get(1) {
        Some(addr) => addr.parse()?,
        None => "127.0.0.1:8080".parse()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bytehub=debug".parse()?)
                .add_directive("chat=debug".parse()?),
        )
        .init();

    let server = ChatServer::new(bind_addr);

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
