use std::collections::HashMap;

use super::topic::{Topic, TopicId};
use crate::utils::error::CommandError;

/// The topic directory: the mapping from topic identifier to topic
/// metadata and subscriber identities.
///
/// A topic present in the directory always has a well-defined name and
/// publisher, set at creation and immutable thereafter. The directory is
/// mutated from every client session and every peer link; it is only ever
/// accessed through the `Broker` mutex.
#[derive(Debug, Default)]
pub struct Directory {
    topics: HashMap<TopicId, Topic>,
}

impl Directory {
    /// Inserts a new topic. Signals `TopicAlreadyExists` when the id is
    /// taken; the replication path discards that error, making replicated
    /// CREATE idempotent by id.
    pub fn create(&mut self, id: &str, name: &str, publisher: &str) -> Result<(), CommandError> {
        if self.topics.contains_key(id) {
            return Err(CommandError::TopicAlreadyExists { id: id.to_string() });
        }
        self.topics
            .insert(id.to_string(), Topic::new(id, name, publisher));
        Ok(())
    }

    /// Removes a topic; returns whether it existed.
    pub fn delete(&mut self, id: &str) -> bool {
        self.topics.remove(id).is_some()
    }

    pub fn add_subscriber(&mut self, id: &str, subscriber: &str) -> Result<(), CommandError> {
        let topic = self
            .topics
            .get_mut(id)
            .ok_or_else(|| CommandError::TopicNotFound { id: id.to_string() })?;
        topic.subscribe(subscriber.to_string());
        Ok(())
    }

    pub fn remove_subscriber(&mut self, id: &str, subscriber: &str) -> Result<(), CommandError> {
        let topic = self
            .topics
            .get_mut(id)
            .ok_or_else(|| CommandError::TopicNotFound { id: id.to_string() })?;
        topic.unsubscribe(subscriber);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// All topics, for DISPLAY.
    pub fn list_all(&self) -> impl Iterator<Item = &Topic> {
        self.topics.values()
    }

    /// Topics owned by `publisher`, for SHOW.
    pub fn list_by_publisher<'a>(&'a self, publisher: &'a str) -> impl Iterator<Item = &'a Topic> {
        self.topics.values().filter(move |t| t.publisher == publisher)
    }

    /// Topics where `subscriber` is a member, for CURRENT.
    pub fn list_by_subscriber<'a>(&'a self, subscriber: &'a str) -> impl Iterator<Item = &'a Topic> {
        self.topics
            .values()
            .filter(move |t| t.subscribers.contains(subscriber))
    }
}
