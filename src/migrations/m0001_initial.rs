use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0001_initial_schema")
        // Delivered announcements, keyed by fingerprint
        .operation(
            CreateTable::new("seen_announcements")
                .add_field(Field::new("fingerprint", FieldType::Text).primary_key())
                .add_field(Field::new("source_id", FieldType::Text).not_null().default("''"))
                .add_field(Field::new("title", FieldType::Text).not_null().default("''"))
                .add_field(Field::new("published_date", FieldType::Text).not_null().default("''"))
                .add_field(Field::new("recorded_at", FieldType::Text).not_null()),
        )
        .operation(AddIndex::new(
            "seen_announcements",
            Index::new("idx_seen_announcements_recorded_at").column("recorded_at"),
        ))
        // Generic key/value status register
        .operation(
            CreateTable::new("bot_status")
                .add_field(Field::new("key", FieldType::Text).primary_key())
                .add_field(Field::new("value", FieldType::Text).not_null())
                .add_field(Field::new("updated_at", FieldType::Text).not_null()),
        )
}
