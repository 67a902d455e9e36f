//! The `protocol` module defines the newline-delimited text protocol spoken
//! on every broker socket: the one-line connection handshake, the command
//! grammar, and the format of published messages pushed to subscribers.

pub mod command;

pub use command::Command;

use chrono::Local;

/// Result of classifying the first line of a new connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handshake {
    /// A peer broker. The optional token is the dialing broker's advertised
    /// `host:port`, used to refuse duplicate mesh links.
    Broker(Option<String>),
    /// A publisher or subscriber client.
    Client,
}

/// Parses the classification line sent as the first line of every connection.
///
/// Returns `None` for anything that is neither `BROKER` nor `CLIENT`; such
/// connections are dropped without a response. The marker is matched
/// case-insensitively.
pub fn parse_handshake(line: &str) -> Option<Handshake> {
    let mut tokens = line.split_whitespace();
    let marker = tokens.next()?;
    if marker.eq_ignore_ascii_case("BROKER") {
        Some(Handshake::Broker(tokens.next().map(str::to_string)))
    } else if marker.eq_ignore_ascii_case("CLIENT") {
        Some(Handshake::Client)
    } else {
        None
    }
}

/// Formats a published message as delivered to subscriber sockets:
/// `[<dd/MM HH:mm:ss>] [Topic <id>:<name>] [<body>]`.
pub fn format_message(topic_id: &str, topic_name: &str, body: &str) -> String {
    let timestamp = Local::now().format("%d/%m %H:%M:%S");
    format!("[{timestamp}] [Topic {topic_id}:{topic_name}] [{body}]")
}
