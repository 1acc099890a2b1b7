//! Implementation of the canonical record identifier and creation stamps.

use crate::{UuidError, UuidResult};
use chrono::{DateTime, Duration, Utc};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical record identifier (32 lowercase hex characters, no hyphens).
///
/// # Construction
/// - [`RecordId::new`] generates a fresh identifier.
/// - [`RecordId::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordId {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "record id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(e.to_string()))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical form.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for RecordId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Creation stamp for an append-only log entry.
///
/// When generated with the previous stamp of the same log, the timestamp is strictly greater
/// than the previous one (bumped by 1 ms if the clock has not advanced), so log order and
/// timestamp order always agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordStamp {
    created_at: DateTime<Utc>,
    id: RecordId,
}

impl RecordStamp {
    /// Generate a stamp at the current time.
    pub fn generate(previous: Option<&RecordStamp>) -> Self {
        Self::generate_at(Utc::now(), previous)
    }

    /// Generate a stamp at `now`, keeping it strictly after `previous`.
    pub fn generate_at(now: DateTime<Utc>, previous: Option<&RecordStamp>) -> Self {
        let created_at = match previous {
            Some(prev) if now <= prev.created_at => prev.created_at + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            created_at,
            id: RecordId::new(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_generates_canonical_id() {
        let id = RecordId::new().to_string();
        assert_eq!(id.len(), 32);
        assert!(RecordId::is_canonical(&id));
    }

    #[test]
    fn parse_accepts_canonical_id() {
        let canonical = "550e8400e29b41d4a716446655440000";
        let id = RecordId::parse(canonical).expect("canonical id");
        assert_eq!(id.to_string(), canonical);
    }

    #[test]
    fn parse_rejects_non_canonical_forms() {
        for input in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400E29B41D4A716446655440000",
            "550e8400",
            "zz0e8400e29b41d4a716446655440000",
        ] {
            let err = RecordId::parse(input).expect_err("should reject");
            assert!(matches!(err, UuidError::InvalidInput(msg) if msg.contains("32 lowercase")));
        }
    }

    #[test]
    fn serde_uses_canonical_string() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").expect("valid");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");
        let back: RecordId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }

    #[test]
    fn stamp_is_strictly_after_previous_on_same_instant() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let first = RecordStamp::generate_at(now, None);
        let second = RecordStamp::generate_at(now, Some(&first));
        assert_eq!(first.created_at(), now);
        assert_eq!(second.created_at(), now + Duration::milliseconds(1));
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn stamp_keeps_clock_time_when_it_advanced() {
        let earlier = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 0).unwrap();
        let first = RecordStamp::generate_at(earlier, None);
        let second = RecordStamp::generate_at(later, Some(&first));
        assert_eq!(second.created_at(), later);
    }
}
