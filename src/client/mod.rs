//! The `client` module defines the representation of a connected client.
//!
//! It provides the `Connection` struct, which encapsulates the state of a
//! single accepted socket: its unique identifier and the channel feeding the
//! connection's dedicated writer task.

pub mod connection;

pub use connection::{Connection, ConnectionId};
