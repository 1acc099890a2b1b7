//! Record identifiers.
//!
//! Healthdesk identifies committed records (symptom records, family roster entries) with a
//! *canonical* UUID representation: **32 lowercase hexadecimal characters** (no hyphens).
//!
//! This crate provides:
//! - [`RecordId`], a wrapper that guarantees the canonical format once constructed.
//! - [`RecordStamp`], a creation timestamp paired with a [`RecordId`] whose timestamps are
//!   strictly increasing when generated from the previous stamp of the same log.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! Externally supplied identifiers (CLI arguments, config files) must already be canonical;
//! uppercase or hyphenated values are rejected rather than normalised.

mod service;

pub use service::{RecordId, RecordStamp, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
