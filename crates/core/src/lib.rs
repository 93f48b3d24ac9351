//! Domain logic for the secure document-access subsystem.
//!
//! This crate has no I/O: everything here is deterministic and unit-testable.
//! The `db` and `api` crates build persistence and the HTTP surface on top.

pub mod anomaly;
pub mod error;
pub mod range;
pub mod signer;
pub mod types;
pub mod watermark;
