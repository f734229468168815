//! Shared test utilities for the artifact wagon crates.
//!
//! This crate provides:
//! - Proptest generators for endpoints, statuses, header values and paths
//! - A scripted HTTP transport that records requests
//! - Test fixtures with sample service payloads

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::MockTransport;
