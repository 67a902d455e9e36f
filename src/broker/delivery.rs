use std::collections::HashMap;

use super::topic::TopicId;
use crate::client::{Connection, ConnectionId};
use tokio::sync::mpsc::UnboundedSender;

/// The local delivery table: the mapping from topic identifier to the
/// locally attached connections currently registered as subscribers.
///
/// This table is inherently per-process. A topic's subscriber set
/// (usernames) is replicated cluster-wide, but message push must target
/// live sockets, which never leave the process that accepted them. An
/// entry is added when a connection issues SUBSCRIBE and removed on
/// UNSUBSCRIBE, on DELETE of the topic, or when the connection closes.
#[derive(Debug, Default)]
pub struct DeliveryTable {
    entries: HashMap<TopicId, HashMap<ConnectionId, UnboundedSender<String>>>,
}

impl DeliveryTable {
    /// Registers `conn` as a delivery target for the topic. Re-registering
    /// the same connection replaces its sender and tracks it once.
    pub fn register(&mut self, topic_id: &str, conn: &Connection) {
        self.entries
            .entry(topic_id.to_string())
            .or_default()
            .insert(conn.id.clone(), conn.sender.clone());
    }

    pub fn deregister(&mut self, topic_id: &str, conn_id: &ConnectionId) {
        if let Some(targets) = self.entries.get_mut(topic_id) {
            targets.remove(conn_id);
            if targets.is_empty() {
                self.entries.remove(topic_id);
            }
        }
    }

    /// Drops every delivery target of a deleted topic.
    pub fn drop_topic(&mut self, topic_id: &str) {
        self.entries.remove(topic_id);
    }

    /// Sweeps a closed connection out of every topic entry, so no future
    /// publish can target its dead channel.
    pub fn drop_connection(&mut self, conn_id: &ConnectionId) {
        for targets in self.entries.values_mut() {
            targets.remove(conn_id);
        }
        self.entries.retain(|_, targets| !targets.is_empty());
    }

    /// The delivery targets for a topic. Callers hold the broker lock while
    /// iterating, so the snapshot cannot race a concurrent SUBSCRIBE or
    /// UNSUBSCRIBE on the same topic.
    pub fn senders_for(
        &self,
        topic_id: &str,
    ) -> impl Iterator<Item = (&ConnectionId, &UnboundedSender<String>)> {
        self.entries.get(topic_id).into_iter().flatten()
    }

    /// Number of registered delivery targets for a topic.
    pub fn target_count(&self, topic_id: &str) -> usize {
        self.entries.get(topic_id).map_or(0, HashMap::len)
    }
}
