//! The `utils` module provides shared definitions used across `meshsub`:
//! the command error taxonomy and logging initialization.

pub mod error;
pub mod logging;
