//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique, as entered at sign-up.
        email -> Text,
        display_name -> Text,
        avatar_url -> Nullable<Text>,
        /// Linked GitHub account id, unique when present.
        github_id -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Boards and their member sets.
    boards (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        owner_id -> Uuid,
        member_ids -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cards; `position` orders all cards of one board.
    cards (id) {
        id -> Uuid,
        board_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        status -> Text,
        position -> Float8,
        member_ids -> Array<Uuid>,
        /// Live task count, maintained by the task repository.
        tasks_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks; `position` orders the tasks of one card.
    tasks (id) {
        id -> Uuid,
        card_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        priority -> Text,
        status -> Text,
        deadline -> Nullable<Timestamptz>,
        position -> Float8,
        assigned_to -> Nullable<Uuid>,
        created_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outstanding one-time codes, one per purpose and subject.
    one_time_codes (purpose, subject) {
        purpose -> Text,
        subject -> Text,
        /// SHA-256 hex digest; raw codes are never stored.
        digest -> Text,
        expires_at -> Timestamptz,
    }
}

diesel::joinable!(boards -> users (owner_id));
diesel::joinable!(cards -> boards (board_id));
diesel::joinable!(tasks -> cards (card_id));

diesel::allow_tables_to_appear_in_same_query!(boards, cards, one_time_codes, tasks, users);
