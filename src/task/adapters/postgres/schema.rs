//! Diesel schema for task and project persistence.

diesel::table! {
    /// Projects and their configured status pipelines.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Trimmed project title, unique per owner.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Owning user.
        owner_id -> Uuid,
        /// Member identifiers as a JSON array.
        members -> Jsonb,
        /// Ordered status labels as a JSON array.
        statuses -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records, unique by `(project_id, title)`.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Trimmed task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Status label.
        #[max_length = 100]
        status -> Varchar,
        /// Optional assignee.
        assignee_id -> Nullable<Uuid>,
        /// Creating user.
        created_by -> Uuid,
        /// Comments as a JSON array in posting order.
        comments -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Timestamp of entry into "Done".
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
