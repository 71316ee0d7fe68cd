//! Sluice Core
//!
//! Core types and abstractions for the Sluice workload dispatcher.
//!
//! This crate contains:
//! - Domain types: Core business entities (JobTemplate, Execution, etc.)
//! - DTOs: Data transfer objects for the admin surface

pub mod domain;
pub mod dto;
