//! Data models for noticewatch.

mod announcement;
mod seen;
mod source;

pub use announcement::{Announcement, Attachment};
pub use seen::{
    validate_check_interval, SeenEntry, SeenStats, StatusEntry, DEFAULT_CHECK_INTERVAL_MINUTES,
    MAX_CHECK_INTERVAL_MINUTES, MIN_CHECK_INTERVAL_MINUTES, STATUS_CHECK_INTERVAL,
    STATUS_LAST_CHECK,
};
pub use source::{CatalogEntry, SourceDescriptor, SourceKind};
