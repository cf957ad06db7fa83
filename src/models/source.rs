//! Source models for tracked announcement origins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of announcement source, selecting which extractor reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// An individual staff profile page with a collapsible announcement list.
    Profile,
    /// A department announcement listing with per-item detail pages.
    Department,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Department => "department",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "profile" => Some(Self::Profile),
            "department" => Some(Self::Department),
            _ => None,
        }
    }
}

/// A catalog entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier; part of every fingerprint from this source.
    pub id: String,
    /// Display name used in messages.
    pub name: String,
    /// Page URL (profile page or department site root).
    pub url: String,
    /// Which extractor handles this source.
    pub kind: SourceKind,
}

impl CatalogEntry {
    pub fn new(id: &str, name: &str, url: &str, kind: SourceKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            kind,
        }
    }
}

/// A tracked source as handed to the record extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Page URL.
    pub url: String,
    /// Extractor kind.
    pub kind: SourceKind,
    /// Number shown to administrators (`/follow 3`).
    pub position: i32,
    /// Whether runs check this source.
    pub enabled: bool,
    /// Last time the tracking flag changed.
    pub updated_at: DateTime<Utc>,
}

impl SourceDescriptor {
    /// Build an enabled descriptor, mostly useful in tests and seeding.
    pub fn new(id: &str, name: &str, url: &str, kind: SourceKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            kind,
            position: 0,
            enabled: true,
            updated_at: Utc::now(),
        }
    }
}
