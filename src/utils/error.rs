use thiserror::Error;

/// Errors produced while applying a client command.
///
/// The `Display` form of each variant is exactly the `[ERROR]` line written
/// back to the client, so call sites respond with `err.to_string()`.
/// Transport-level failures (unreachable peers, closed connections) are not
/// part of this taxonomy; they are logged and never surface to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("[ERROR] Usage: {usage}")]
    Malformed { usage: &'static str },

    #[error("[ERROR] Topic not found: {id}")]
    TopicNotFound { id: String },

    #[error("[ERROR] Topic already exists: {id}")]
    TopicAlreadyExists { id: String },

    #[error("[ERROR] No topics available.")]
    EmptyDirectory,

    #[error("[ERROR] Unknown command: {keyword}")]
    UnknownCommand { keyword: String },
}
