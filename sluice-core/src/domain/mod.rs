//! Domain types
//!
//! Core business entities shared between the dispatcher daemon, the admin
//! client, and the CLI.

pub mod execution;
pub mod message;
pub mod template;
