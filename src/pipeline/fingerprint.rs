//! Announcement identity.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of an announcement.
///
/// Each component is written as `<utf8 byte length>:<value>` and the three
/// are joined with `|`, then hashed with SHA-256 and rendered as 64
/// lowercase hex characters. The length prefixes keep distinct triples from
/// colliding when a component contains the separator.
///
/// The encoding is persisted: changing it makes every stored entry unknown.
pub fn fingerprint(source_id: &str, published_date: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in [source_id, published_date, title].iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.len().to_string().as_bytes());
        hasher.update(b":");
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
