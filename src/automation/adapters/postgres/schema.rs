//! Diesel schema for automation rule persistence.

diesel::table! {
    /// Automation rules in their wire form.
    automation_rules (id) {
        /// Rule identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Trigger name.
        #[max_length = 64]
        trigger -> Varchar,
        /// Trigger condition payload.
        condition -> Nullable<Jsonb>,
        /// Action payload.
        action -> Nullable<Jsonb>,
        /// Creating user.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
