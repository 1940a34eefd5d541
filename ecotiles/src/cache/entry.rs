//! URL-tier entry encoding.
//!
//! A minted template is stored together with the instant it was issued, as
//! UTF-8 text `"<template>, <RFC 3339 timestamp>"`. Decoding splits at the
//! last `", "` so templates that contain that separator survive.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

const SEPARATOR: &str = ", ";

/// Errors decoding a stored URL entry.
#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("entry is not valid UTF-8")]
    NotUtf8,

    #[error("entry has no timestamp separator")]
    MissingSeparator,

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// A minted tile URL template and its issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedUrlEntry {
    pub template: String,
    pub issued_at: DateTime<Utc>,
}

impl CachedUrlEntry {
    pub fn new(template: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            template: template.into(),
            issued_at,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!("{}{}{}", self.template, SEPARATOR, self.issued_at.to_rfc3339()).into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EntryError> {
        let text = std::str::from_utf8(bytes).map_err(|_| EntryError::NotUtf8)?;
        let (template, stamp) = text
            .rsplit_once(SEPARATOR)
            .ok_or(EntryError::MissingSeparator)?;
        let issued_at = DateTime::parse_from_rfc3339(stamp.trim())
            .map_err(|_| EntryError::InvalidTimestamp(stamp.to_string()))?
            .with_timezone(&Utc);
        Ok(Self::new(template, issued_at))
    }

    /// Whether the entry is still usable at `now`: `now - issued_at < ttl`.
    pub fn is_valid(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.issued_at) < ttl
    }
}
