//! Announcement models.
//!
//! An [`Announcement`] is one candidate record as scraped from a source. It is
//! built fresh on every run and never mutated; only its fingerprint and a few
//! denormalized fields outlive the run (see [`crate::models::SeenEntry`]).

use serde::{Deserialize, Serialize};

use crate::pipeline::fingerprint;

/// A downloadable file linked from an announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Link text, or the last URL segment when the link has no text.
    pub name: String,
    /// Absolute URL.
    pub url: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One announcement detected on a source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Identifier of the source this came from.
    pub source_id: String,
    /// Display name of the source (not part of the identity).
    pub source_name: String,
    /// Date as printed by the source. Not parsed.
    pub published_date: String,
    /// Short title.
    pub title: String,
    /// Body text, already capped by the extractor.
    pub body: String,
    /// Linked files in page order.
    pub attachments: Vec<Attachment>,
    /// Detail or source page URL.
    pub origin_url: String,
}

impl Announcement {
    /// Create an announcement with an empty body and no attachments.
    pub fn new(
        source_id: impl Into<String>,
        source_name: impl Into<String>,
        published_date: impl Into<String>,
        title: impl Into<String>,
        origin_url: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_name: source_name.into(),
            published_date: published_date.into(),
            title: title.into(),
            body: String::new(),
            attachments: Vec::new(),
            origin_url: origin_url.into(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Stable identity of this announcement.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.source_id, &self.published_date, &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_does_not_affect_identity() {
        let a = Announcement::new("prof-1", "Prof. A", "05.01.2026", "Midterm", "https://x")
            .with_body("Room 101");
        let b = Announcement::new("prof-1", "Prof. A", "05.01.2026", "Midterm", "https://y")
            .with_body("Room 202")
            .with_attachments(vec![Attachment::new("a.pdf", "https://x/a.pdf")]);

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_source_name_does_not_affect_identity() {
        let a = Announcement::new("prof-1", "Prof. A", "05.01.2026", "Midterm", "https://x");
        let b = Announcement::new("prof-1", "Dr. A", "05.01.2026", "Midterm", "https://x");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
