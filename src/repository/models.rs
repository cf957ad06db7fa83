//! Diesel records for the database tables.

use diesel::prelude::*;

use crate::schema;

/// Seen announcement row.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::seen_announcements)]
#[diesel(primary_key(fingerprint))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SeenRecord {
    pub fingerprint: String,
    pub source_id: String,
    pub title: String,
    pub published_date: String,
    pub recorded_at: String,
}

/// Status register row.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::bot_status)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatusRecord {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

/// Tracked source row.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::tracked_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackedSourceRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub kind: String,
    pub position: i32,
    pub enabled: bool,
    pub updated_at: String,
}

/// New tracked source for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::tracked_sources)]
pub struct NewTrackedSource<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub url: &'a str,
    pub kind: &'a str,
    pub position: i32,
    pub enabled: bool,
    pub updated_at: &'a str,
}
