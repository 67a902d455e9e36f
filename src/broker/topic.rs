use std::collections::HashSet;

pub type TopicId = String;
pub type SubscriberId = String;

/// A named channel with one publisher identity and a set of subscriber
/// identities. Subscribers are usernames, not connections; the identifiers
/// here are cluster-wide replicated state, while live sockets are tracked
/// separately in the per-process delivery table.
#[derive(Debug, Clone)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    pub publisher: String,
    pub subscribers: HashSet<SubscriberId>,
}

impl Topic {
    pub fn new(id: &str, name: &str, publisher: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            publisher: publisher.to_string(),
            subscribers: HashSet::new(),
        }
    }

    /// Adds a subscriber identity. Already-present subscribers are a no-op.
    pub fn subscribe(&mut self, id: SubscriberId) {
        self.subscribers.insert(id);
    }

    /// Removes a subscriber identity. Absent subscribers are a no-op.
    pub fn unsubscribe(&mut self, id: &str) {
        self.subscribers.remove(id);
    }
}
