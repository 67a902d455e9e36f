//! # meshsub
//!
//! `meshsub` is a minimalist, in-memory distributed publish/subscribe broker.
//! Brokers speak a newline-delimited text protocol over TCP and replicate
//! topic-directory mutations to a mesh of peer brokers on a best-effort basis.
//!
//! ## Core Modules
//!
//! - `broker`: the topic directory, the local delivery table, and the command
//!   application layer shared by client sessions and peer links.
//! - `client`: the handle for a connected client (id plus outbound channel).
//! - `config`: layered configuration with command-line overrides.
//! - `protocol`: the command grammar, the connection handshake, and the
//!   published-message format.
//! - `transport`: the TCP acceptor, client sessions, peer links, peer fan-out,
//!   and the reconnect supervisor.
//! - `utils`: error taxonomy and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod protocol;
pub mod transport;
pub mod utils;
