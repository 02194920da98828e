//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// User records read when addressing pushes.
    users (id) {
        /// Primary key: document identifier.
        id -> Text,
        /// Role, e.g. `driver`.
        role -> Text,
        /// Presence, e.g. `online`.
        status -> Text,
        /// Registered push token.
        fcm_token -> Nullable<Text>,
    }
}

diesel::table! {
    /// Archived orders.
    order_history (id) {
        /// Primary key: document identifier.
        id -> Text,
        /// Completion instant, missing on legacy rows.
        completed_at -> Nullable<Timestamptz>,
        /// Archive instant.
        archived_at -> Nullable<Timestamptz>,
    }
}
