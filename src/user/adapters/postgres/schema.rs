//! Diesel schema for user persistence.

diesel::table! {
    /// Board users.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Unique email address.
        #[max_length = 255]
        email -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Badge labels held by users, one row per `(user_id, label)`.
    user_badges (user_id, label) {
        /// Owning user identifier.
        user_id -> Uuid,
        /// Badge label.
        #[max_length = 255]
        label -> Varchar,
        /// First-grant timestamp.
        granted_at -> Timestamptz,
    }
}

diesel::joinable!(user_badges -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, user_badges);
