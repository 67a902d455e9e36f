use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use super::ServerContext;
use super::peers::{self, PeerLink};
use crate::client::Connection;
use crate::protocol::{Command, Handshake, parse_handshake};
use crate::utils::error::CommandError;

type LineReader = Lines<BufReader<OwnedReadHalf>>;

/// Binds the listen address, dials the configured peers, starts the
/// reconnect supervisor and runs the accept loop.
///
/// Each accepted socket is classified by its first line and handed to its
/// own task; the accept loop never awaits a connection's lifetime.
pub async fn start(ctx: Arc<ServerContext>) -> io::Result<()> {
    let addr = format!("{}:{}", ctx.settings.server.host, ctx.settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "broker listening");

    for peer in ctx.settings.peers.addresses.clone() {
        if let Err(err) = peers::connect_peer(ctx.clone(), &peer).await {
            warn!(addr = %peer, %err, "failed to connect to peer broker");
            ctx.failed.insert(peer);
        }
    }
    tokio::spawn(peers::reconnect_loop(ctx.clone()));

    loop {
        let (stream, remote) = listener.accept().await?;
        let ctx = ctx.clone();
        tokio::spawn(async move {
            handle_socket(ctx, stream, remote).await;
        });
    }
}

/// Spawns the single writer task for a connection. Every line queued on the
/// channel is written with a trailing newline; a write failure ends the
/// task, and the read loop notices the close on its own side.
pub(crate) fn spawn_writer(mut write_half: OwnedWriteHalf, mut rx: UnboundedReceiver<String>) {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if write_half
                .write_all(format!("{line}\n").as_bytes())
                .await
                .is_err()
            {
                break;
            }
        }
    });
}

/// Reads the classification line and dispatches the socket to a client
/// session or a peer link. Unclassified connections are dropped silently.
async fn handle_socket(ctx: Arc<ServerContext>, stream: tokio::net::TcpStream, remote: SocketAddr) {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let first = match lines.next_line().await {
        Ok(Some(line)) => line,
        _ => return,
    };
    let Some(handshake) = parse_handshake(&first) else {
        info!(%remote, "dropping unclassified connection");
        return;
    };

    let (tx, rx) = mpsc::unbounded_channel();
    spawn_writer(write_half, rx);

    match handshake {
        Handshake::Client => {
            run_client_session(ctx, lines, Connection::new(tx)).await;
        }
        Handshake::Broker(advertised) => {
            if let Some(addr) = &advertised {
                if ctx.peers.contains_addr(addr) {
                    info!(%remote, %addr, "refusing duplicate peer link");
                    return;
                }
            }
            info!(%remote, "accepted connection from another broker");
            run_peer_link(ctx, lines, PeerLink::new(tx, advertised)).await;
        }
    }
}

/// One client session: reads one command per line until the socket closes,
/// then removes the connection from the delivery table across all topics.
pub(crate) async fn run_client_session(
    ctx: Arc<ServerContext>,
    mut lines: LineReader,
    conn: Connection,
) {
    info!(connection = %conn.id, "client session started");
    while let Ok(Some(line)) = lines.next_line().await {
        handle_client_line(&ctx, &conn, &line);
    }
    ctx.broker.lock().unwrap().cleanup_connection(&conn.id);
    info!(connection = %conn.id, "client session closed");
}

/// Parses and applies one client command line, responds on the client's
/// channel, and replicates mutating commands to the peer mesh.
///
/// Replication is gated on successful local application: a command that
/// fails locally is answered with its `[ERROR]` line and never forwarded.
pub(crate) fn handle_client_line(ctx: &ServerContext, conn: &Connection, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let cmd = match Command::parse(line) {
        Ok(cmd) => cmd,
        Err(err) => {
            conn.send(err.to_string());
            return;
        }
    };

    let replicate = cmd.is_mutating();
    match apply_client_command(ctx, conn, cmd) {
        Ok(responses) => {
            for response in responses {
                conn.send(response);
            }
            if replicate {
                ctx.peers.broadcast(line);
            }
        }
        Err(err) => {
            conn.send(err.to_string());
        }
    }
}

/// Applies a command on behalf of a locally attached client and produces
/// the response lines. SHOW and CURRENT are silent when nothing matches;
/// DISPLAY on an empty directory is an error.
fn apply_client_command(
    ctx: &ServerContext,
    conn: &Connection,
    cmd: Command,
) -> Result<Vec<String>, CommandError> {
    let mut broker = ctx.broker.lock().unwrap();
    match cmd {
        Command::Create {
            id,
            name,
            publisher,
        } => {
            broker.create(&id, &name, &publisher)?;
            info!(topic = %id, %publisher, "topic created");
            Ok(vec![format!("[SUCCESS] Topic created: {id} - {name}")])
        }
        Command::Publish { id, body } => {
            broker.publish(&id, &body)?;
            Ok(vec![format!("[SUCCESS] Message published: {id}")])
        }
        Command::Subscribe { id, subscriber } => {
            broker.subscribe(&id, &subscriber, Some(conn))?;
            info!(topic = %id, %subscriber, "subscribed");
            Ok(vec![format!("[SUCCESS] Subscribed to topic: {id}")])
        }
        Command::Unsubscribe { id, subscriber } => {
            broker.unsubscribe(&id, &subscriber, Some(&conn.id))?;
            info!(topic = %id, %subscriber, "unsubscribed");
            Ok(vec![format!("[SUCCESS] Unsubscribed from topic: {id}")])
        }
        Command::Delete { id } => {
            broker.delete(&id)?;
            info!(topic = %id, "topic deleted");
            Ok(vec![format!("[SUCCESS] Topic deleted: {id}")])
        }
        Command::Show { publisher } => Ok(broker
            .directory
            .list_by_publisher(&publisher)
            .map(|t| {
                format!(
                    "[Topic ID:{}] [Name:{}] [Subscribers:{}]",
                    t.id,
                    t.name,
                    t.subscribers.len()
                )
            })
            .collect()),
        Command::Display => {
            if broker.directory.is_empty() {
                return Err(CommandError::EmptyDirectory);
            }
            Ok(broker
                .directory
                .list_all()
                .map(|t| {
                    format!(
                        "[Topic ID:{}] [Name:{}] [Publisher:{}]",
                        t.id, t.name, t.publisher
                    )
                })
                .collect())
        }
        Command::Current { subscriber } => Ok(broker
            .directory
            .list_by_subscriber(&subscriber)
            .map(|t| {
                format!(
                    "[Topic ID:{}] [Name:{}] [Publisher:{}]",
                    t.id, t.name, t.publisher
                )
            })
            .collect()),
    }
}

/// One peer link: applies replicated lines until the socket closes, then
/// removes itself from the peer set and, when the address is a configured
/// peer, queues it for the reconnect supervisor.
pub(crate) async fn run_peer_link(ctx: Arc<ServerContext>, mut lines: LineReader, link: PeerLink) {
    ctx.peers.insert(link.clone());
    while let Ok(Some(line)) = lines.next_line().await {
        apply_replicated(&ctx, &line);
    }
    ctx.peers.remove(&link.id);
    info!(peer = %link.id, addr = ?link.addr, "peer link closed");

    if let Some(addr) = link.addr {
        if ctx.settings.peers.addresses.contains(&addr) {
            info!(%addr, "scheduling peer for reconnect");
            ctx.failed.insert(addr);
        }
    }
}

/// Applies one replicated command line from a peer broker.
///
/// Peer links never respond on the socket and never re-broadcast, which
/// keeps a command from looping through the mesh. Failures (duplicate
/// CREATE, missing topic) are expected cross-broker races and are silently
/// discarded; PUBLISH still fans out to this broker's own local
/// subscribers.
pub(crate) fn apply_replicated(ctx: &ServerContext, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let cmd = match Command::parse(line) {
        Ok(cmd) => cmd,
        Err(err) => {
            warn!(%err, "ignoring malformed replicated line");
            return;
        }
    };

    let mut broker = ctx.broker.lock().unwrap();
    match cmd {
        Command::Create {
            id,
            name,
            publisher,
        } => {
            let _ = broker.create(&id, &name, &publisher);
        }
        Command::Publish { id, body } => {
            if let Err(err) = broker.publish(&id, &body) {
                debug!(%err, "replicated publish to unknown topic");
            }
        }
        Command::Subscribe { id, subscriber } => {
            let _ = broker.subscribe(&id, &subscriber, None);
        }
        Command::Unsubscribe { id, subscriber } => {
            let _ = broker.unsubscribe(&id, &subscriber, None);
        }
        Command::Delete { id } => {
            let _ = broker.delete(&id);
        }
        other => {
            debug!(command = other.keyword(), "ignoring non-replicated command from peer");
        }
    }
}
