//! Diesel table definitions for the course list collections.

diesel::table! {
    bookmarks (id) {
        id -> Bytea,
        user_id -> Text,
        course_ids -> Array<Bytea>,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    carts (id) {
        id -> Bytea,
        user_id -> Text,
        course_ids -> Array<Bytea>,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(bookmarks, carts);
