//! Diesel schema for notification persistence.

diesel::table! {
    /// Append-only notification records.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Recipient user identifier.
        recipient_id -> Uuid,
        /// Task the notification refers to, if any.
        task_id -> Nullable<Uuid>,
        /// Notification kind.
        #[max_length = 50]
        kind -> Varchar,
        /// Rendered message.
        message -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
