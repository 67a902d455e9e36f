use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use uuid::Uuid;

pub type ConnectionId = String;

/// Handle for a connected publisher/subscriber client.
///
/// All outbound traffic for the socket (command responses and publish
/// fan-out) goes through `sender`, which feeds a single writer task, so
/// lines from different directions never interleave on the wire.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Unique identifier for the connection.
    pub id: ConnectionId,

    /// Channel feeding the connection's writer task. One queued item is one
    /// protocol line, without the trailing newline.
    pub sender: UnboundedSender<String>,
}

impl Connection {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self {
            id: format!("client-{}", Uuid::new_v4()),
            sender,
        }
    }

    /// Queues a line for the connection. A closed channel means the socket
    /// is gone and the session is being torn down; the line is dropped.
    pub fn send(&self, line: impl Into<String>) {
        if self.sender.send(line.into()).is_err() {
            debug!(connection = %self.id, "outbound channel closed, dropping line");
        }
    }
}
