use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0002_tracked_sources")
        .depends_on(&["0001_initial_schema"])
        .operation(
            CreateTable::new("tracked_sources")
                .add_field(Field::new("id", FieldType::Text).primary_key())
                .add_field(Field::new("name", FieldType::Text).not_null())
                .add_field(Field::new("url", FieldType::Text).not_null())
                .add_field(Field::new("kind", FieldType::Text).not_null())
                .add_field(Field::new("position", FieldType::Integer).not_null())
                .add_field(Field::new("enabled", FieldType::Integer).not_null().default("1"))
                .add_field(Field::new("updated_at", FieldType::Text).not_null()),
        )
        .operation(AddIndex::new(
            "tracked_sources",
            Index::new("idx_tracked_sources_position")
                .column("position")
                .unique(),
        ))
}
