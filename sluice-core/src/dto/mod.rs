//! Data transfer objects
//!
//! Payload types for the admin surface, shared by the daemon, the admin
//! client, and the CLI.

pub mod execution;
pub mod retry;
pub mod template;
