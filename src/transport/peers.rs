use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ServerContext;
use super::tcp;

/// Handle for one broker-to-broker link, dialed or accepted.
#[derive(Debug, Clone)]
pub struct PeerLink {
    pub id: String,
    /// The peer's address when known: the address we dialed, or the
    /// advertised address an accepted peer sent in its handshake.
    pub addr: Option<String>,
    pub sender: UnboundedSender<String>,
}

impl PeerLink {
    pub fn new(sender: UnboundedSender<String>, addr: Option<String>) -> Self {
        Self {
            id: format!("peer-{}", Uuid::new_v4()),
            addr,
            sender,
        }
    }
}

/// The set of currently open peer links, used by the replication fan-out.
///
/// A link appears here once its handshake completes, regardless of which
/// side dialed. Removal is owned by the link's own read loop reaching
/// end-of-stream; a failed broadcast send never removes a peer.
#[derive(Debug, Default)]
pub struct PeerSet {
    links: Mutex<HashMap<String, PeerLink>>,
}

impl PeerSet {
    pub fn insert(&self, link: PeerLink) {
        self.links.lock().unwrap().insert(link.id.clone(), link);
    }

    pub fn remove(&self, id: &str) -> Option<PeerLink> {
        self.links.lock().unwrap().remove(id)
    }

    /// Whether a link to `addr` is already open, keyed on the dialed or
    /// advertised address. Used to refuse duplicate mesh links.
    pub fn contains_addr(&self, addr: &str) -> bool {
        self.links
            .lock()
            .unwrap()
            .values()
            .any(|link| link.addr.as_deref() == Some(addr))
    }

    /// Broadcasts a replicated command line to every connected peer.
    /// Best-effort: a failed send is logged and the loop continues.
    pub fn broadcast(&self, line: &str) {
        for link in self.links.lock().unwrap().values() {
            if link.sender.send(line.to_string()).is_err() {
                warn!(peer = %link.id, "failed to forward command to peer");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.lock().unwrap().is_empty()
    }
}

/// Configured peer addresses that are not currently connected. An address
/// leaves this set only on successful connection.
#[derive(Debug, Default)]
pub struct FailedPeers {
    addrs: Mutex<HashSet<String>>,
}

impl FailedPeers {
    pub fn insert(&self, addr: String) {
        self.addrs.lock().unwrap().insert(addr);
    }

    pub fn remove(&self, addr: &str) {
        self.addrs.lock().unwrap().remove(addr);
    }

    pub fn contains(&self, addr: &str) -> bool {
        self.addrs.lock().unwrap().contains(addr)
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.addrs.lock().unwrap().iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.lock().unwrap().is_empty()
    }
}

/// Dials a peer broker, sends the `BROKER` identity marker and starts the
/// link's read loop. A link that is already open for `addr` is left alone.
pub async fn connect_peer(ctx: Arc<ServerContext>, addr: &str) -> io::Result<()> {
    if ctx.peers.contains_addr(addr) {
        return Ok(());
    }

    let stream = TcpStream::connect(addr).await?;
    let (read_half, write_half) = stream.into_split();
    let (tx, rx) = mpsc::unbounded_channel();
    tcp::spawn_writer(write_half, rx);

    // identity marker first, carrying our advertised address when configured
    let marker = match &ctx.settings.peers.advertised {
        Some(advertised) => format!("BROKER {advertised}"),
        None => "BROKER".to_string(),
    };
    let _ = tx.send(marker);

    let link = PeerLink::new(tx, Some(addr.to_string()));
    info!(%addr, peer = %link.id, "connected to peer broker");
    let lines = BufReader::new(read_half).lines();
    tokio::spawn(tcp::run_peer_link(ctx, lines, link));
    Ok(())
}

/// The reconnect supervisor: retries every failed peer address on a fixed
/// interval, indefinitely, with no backoff and no retry cap.
pub async fn reconnect_loop(ctx: Arc<ServerContext>) {
    let interval = Duration::from_secs(ctx.settings.peers.reconnect_interval_secs.max(1));
    loop {
        tokio::time::sleep(interval).await;
        for addr in ctx.failed.snapshot() {
            match connect_peer(ctx.clone(), &addr).await {
                Ok(()) => {
                    ctx.failed.remove(&addr);
                    info!(%addr, "reconnected to peer broker");
                }
                Err(err) => {
                    debug!(%addr, %err, "peer still unreachable");
                }
            }
        }
    }
}
