// Kept in sync by hand with src/migrations.

diesel::table! {
    seen_announcements (fingerprint) {
        fingerprint -> Text,
        source_id -> Text,
        title -> Text,
        published_date -> Text,
        recorded_at -> Text,
    }
}

diesel::table! {
    bot_status (key) {
        key -> Text,
        value -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    tracked_sources (id) {
        id -> Text,
        name -> Text,
        url -> Text,
        kind -> Text,
        position -> Integer,
        enabled -> Bool,
        updated_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(bot_status, seen_announcements, tracked_sources,);
