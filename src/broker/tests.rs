use super::Broker;
use super::topic::Topic;
use crate::client::Connection;
use crate::utils::error::CommandError;
use tokio::sync::mpsc;

fn test_connection() -> (Connection, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Connection::new(tx), rx)
}

#[test]
fn test_topic_new() {
    let topic = Topic::new("t1", "Weather", "alice");
    assert_eq!(topic.id, "t1");
    assert_eq!(topic.name, "Weather");
    assert_eq!(topic.publisher, "alice");
    assert!(topic.subscribers.is_empty());
}

#[test]
fn test_topic_subscribe_unsubscribe() {
    let mut topic = Topic::new("t1", "Weather", "alice");
    topic.subscribe("bob".to_string());
    topic.subscribe("bob".to_string());
    assert_eq!(topic.subscribers.len(), 1);
    topic.unsubscribe("bob");
    assert!(topic.subscribers.is_empty());
    // absent subscriber is a no-op
    topic.unsubscribe("carol");
}

#[test]
fn test_create_and_duplicate() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    let err = broker.create("t1", "Sports", "mallory").unwrap_err();
    assert_eq!(
        err,
        CommandError::TopicAlreadyExists {
            id: "t1".to_string()
        }
    );
    // the original topic is untouched
    let topic = broker.directory.get("t1").unwrap();
    assert_eq!(topic.name, "Weather");
    assert_eq!(topic.publisher, "alice");
    assert_eq!(broker.directory.len(), 1);
}

#[test]
fn test_replicated_create_is_idempotent() {
    let mut broker = Broker::new();
    // the replication path applies the same line twice and discards errors
    let _ = broker.create("t1", "Weather", "alice");
    let _ = broker.create("t1", "Weather", "alice");
    assert_eq!(broker.directory.len(), 1);
}

#[test]
fn test_delete() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    broker.delete("t1").unwrap();
    assert!(broker.directory.is_empty());
    assert_eq!(
        broker.delete("t1").unwrap_err(),
        CommandError::TopicNotFound {
            id: "t1".to_string()
        }
    );
}

#[test]
fn test_delete_drops_delivery_targets() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    let (conn, _rx) = test_connection();
    broker.subscribe("t1", "bob", Some(&conn)).unwrap();
    assert_eq!(broker.delivery.target_count("t1"), 1);

    broker.delete("t1").unwrap();
    assert_eq!(broker.delivery.target_count("t1"), 0);
}

#[test]
fn test_subscribe_unknown_topic() {
    let mut broker = Broker::new();
    let (conn, _rx) = test_connection();
    let err = broker.subscribe("t9", "bob", Some(&conn)).unwrap_err();
    assert_eq!(
        err,
        CommandError::TopicNotFound {
            id: "t9".to_string()
        }
    );
    assert_eq!(broker.delivery.target_count("t9"), 0);
}

#[test]
fn test_subscribe_records_identity_and_connection() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    let (conn, _rx) = test_connection();
    broker.subscribe("t1", "bob", Some(&conn)).unwrap();

    assert!(broker.directory.get("t1").unwrap().subscribers.contains("bob"));
    assert_eq!(broker.delivery.target_count("t1"), 1);
}

#[test]
fn test_replicated_subscribe_has_no_delivery_target() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    broker.subscribe("t1", "bob", None).unwrap();

    assert!(broker.directory.get("t1").unwrap().subscribers.contains("bob"));
    assert_eq!(broker.delivery.target_count("t1"), 0);
}

#[test]
fn test_unsubscribe() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    let (conn, _rx) = test_connection();
    broker.subscribe("t1", "bob", Some(&conn)).unwrap();

    broker.unsubscribe("t1", "bob", Some(&conn.id)).unwrap();
    assert!(!broker.directory.get("t1").unwrap().subscribers.contains("bob"));
    assert_eq!(broker.delivery.target_count("t1"), 0);
}

#[test]
fn test_publish_delivers_formatted_line() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    let (conn, mut rx) = test_connection();
    broker.subscribe("t1", "bob", Some(&conn)).unwrap();

    let formatted = broker.publish("t1", "rain tomorrow").unwrap();
    assert!(formatted.ends_with("[Topic t1:Weather] [rain tomorrow]"));

    let delivered = rx.try_recv().unwrap();
    assert_eq!(delivered, formatted);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_publish_without_subscribers_delivers_nowhere() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    broker.publish("t1", "sunny today").unwrap();
}

#[test]
fn test_publish_unknown_topic() {
    let broker = Broker::new();
    assert_eq!(
        broker.publish("t9", "hello").unwrap_err(),
        CommandError::TopicNotFound {
            id: "t9".to_string()
        }
    );
}

#[test]
fn test_publish_skips_closed_channel() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    let (conn, rx) = test_connection();
    broker.subscribe("t1", "bob", Some(&conn)).unwrap();
    drop(rx);

    // no panic, delivery to the dead target is skipped
    broker.publish("t1", "hello").unwrap();
}

#[test]
fn test_cleanup_connection_sweeps_all_topics() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    broker.create("t2", "Sports", "alice").unwrap();
    let (conn, _rx) = test_connection();
    broker.subscribe("t1", "bob", Some(&conn)).unwrap();
    broker.subscribe("t2", "bob", Some(&conn)).unwrap();

    broker.cleanup_connection(&conn.id);
    assert_eq!(broker.delivery.target_count("t1"), 0);
    assert_eq!(broker.delivery.target_count("t2"), 0);
    // replicated subscriber identities survive the disconnect
    assert!(broker.directory.get("t1").unwrap().subscribers.contains("bob"));
}

#[test]
fn test_directory_listings() {
    let mut broker = Broker::new();
    broker.create("t1", "Weather", "alice").unwrap();
    broker.create("t2", "Sports", "alice").unwrap();
    broker.create("t3", "News", "carol").unwrap();
    broker.subscribe("t1", "bob", None).unwrap();
    broker.subscribe("t3", "bob", None).unwrap();

    assert_eq!(broker.directory.list_all().count(), 3);
    assert_eq!(broker.directory.list_by_publisher("alice").count(), 2);
    assert_eq!(broker.directory.list_by_publisher("nobody").count(), 0);
    assert_eq!(broker.directory.list_by_subscriber("bob").count(), 2);
}
