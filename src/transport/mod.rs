//! The `transport` module is responsible for all network communication:
//! the TCP accept loop with its one-line peer/client handshake, the
//! per-connection client sessions and peer links, the best-effort peer
//! fan-out, and the reconnect supervisor for unreachable peers.

pub mod peers;
pub mod tcp;

use std::sync::Mutex;

use crate::broker::Broker;
use crate::config::Settings;
use peers::{FailedPeers, PeerSet};

/// Shared state of one broker instance, handed to every connection task.
///
/// The broker (topic directory plus delivery table) sits behind a single
/// mutex so that commands touching both appear atomic; the peer sets carry
/// their own locks and are mutated independently by links and the
/// reconnect supervisor.
#[derive(Debug)]
pub struct ServerContext {
    pub settings: Settings,
    pub broker: Mutex<Broker>,
    pub peers: PeerSet,
    pub failed: FailedPeers,
}

impl ServerContext {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            broker: Mutex::new(Broker::new()),
            peers: PeerSet::default(),
            failed: FailedPeers::default(),
        }
    }
}
