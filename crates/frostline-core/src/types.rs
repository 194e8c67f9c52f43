//! Shared type aliases for datetime handling

use chrono::{DateTime as ChronoDateTime, Utc};

/// Database DateTime type used across all Frostline crates
///
/// This is the canonical datetime type for TIMESTAMPTZ columns.
pub type DBDateTime = ChronoDateTime<Utc>;

/// Standard UTC DateTime type used across all Frostline crates
///
/// Serializes as ISO 8601 with 'Z' suffix in API responses.
pub type UtcDateTime = ChronoDateTime<Utc>;
