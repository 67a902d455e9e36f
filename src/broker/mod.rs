//! The `broker` module is the core of the system: it owns the topic
//! directory (cluster-replicated topic metadata and subscriber identities)
//! and the local delivery table (live sockets owned by this process), and
//! applies the mutating protocol commands against both.

pub mod delivery;
pub mod directory;
pub mod topic;

pub use directory::Directory;
pub use topic::{SubscriberId, Topic, TopicId};

use crate::client::{Connection, ConnectionId};
use crate::protocol;
use crate::utils::error::CommandError;
use delivery::DeliveryTable;
use tracing::warn;

/// Command application layer over the topic directory and the local
/// delivery table.
///
/// The two structures are kept together because SUBSCRIBE, UNSUBSCRIBE and
/// DELETE touch both and must appear atomic to readers; the whole `Broker`
/// sits behind a single mutex in the server context.
///
/// Every operation here is origin-agnostic: client sessions report returned
/// errors back on the socket and replicate successes, while peer links
/// discard errors and never replicate, which yields the idempotent
/// replication-path semantics (duplicate CREATE and missing-topic mutations
/// are silent no-ops at a peer).
#[derive(Debug, Default)]
pub struct Broker {
    pub(crate) directory: Directory,
    pub(crate) delivery: DeliveryTable,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a topic. Fails when the id is already present; name and
    /// publisher are immutable once set.
    pub fn create(&mut self, id: &str, name: &str, publisher: &str) -> Result<(), CommandError> {
        self.directory.create(id, name, publisher)
    }

    /// Deletes a topic and drops its local delivery entries.
    pub fn delete(&mut self, id: &str) -> Result<(), CommandError> {
        if !self.directory.delete(id) {
            return Err(CommandError::TopicNotFound { id: id.to_string() });
        }
        self.delivery.drop_topic(id);
        Ok(())
    }

    /// Records `subscriber` on the topic and, when the subscription comes
    /// from a locally attached connection, registers that connection for
    /// message delivery.
    pub fn subscribe(
        &mut self,
        id: &str,
        subscriber: &str,
        conn: Option<&Connection>,
    ) -> Result<(), CommandError> {
        self.directory.add_subscriber(id, subscriber)?;
        if let Some(conn) = conn {
            self.delivery.register(id, conn);
        }
        Ok(())
    }

    /// Removes `subscriber` from the topic. A replicated unsubscribe has no
    /// matching local connection to deregister, so `conn_id` is `None`.
    pub fn unsubscribe(
        &mut self,
        id: &str,
        subscriber: &str,
        conn_id: Option<&ConnectionId>,
    ) -> Result<(), CommandError> {
        self.directory.remove_subscriber(id, subscriber)?;
        if let Some(conn_id) = conn_id {
            self.delivery.deregister(id, conn_id);
        }
        Ok(())
    }

    /// Formats a message for the topic and pushes it to every locally
    /// registered subscriber connection. Returns the formatted line.
    ///
    /// Sends are non-blocking channel writes; a closed channel belongs to a
    /// connection that is already shutting down and is skipped.
    pub fn publish(&self, id: &str, body: &str) -> Result<String, CommandError> {
        let topic = self
            .directory
            .get(id)
            .ok_or_else(|| CommandError::TopicNotFound { id: id.to_string() })?;
        let message = protocol::format_message(id, &topic.name, body);
        for (conn_id, sender) in self.delivery.senders_for(id) {
            if sender.send(message.clone()).is_err() {
                warn!(connection = %conn_id, topic = %id, "subscriber channel closed, skipping delivery");
            }
        }
        Ok(message)
    }

    /// Removes a closed connection from the delivery table across all
    /// topics. Subscriber identities in the directory are replicated state
    /// and deliberately survive the disconnect.
    pub fn cleanup_connection(&mut self, conn_id: &ConnectionId) {
        self.delivery.drop_connection(conn_id);
    }
}

#[cfg(test)]
mod tests;
