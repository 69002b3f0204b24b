//! Diesel schema for report persistence.

diesel::table! {
    /// Report records.
    reports (id) {
        /// Report identifier.
        id -> Uuid,
        /// Disputed task.
        task_id -> Uuid,
        /// Filing user.
        reporter_id -> Uuid,
        /// Reported user.
        reported_user_id -> Uuid,
        /// Reporter side.
        #[max_length = 20]
        reporter_type -> Varchar,
        /// Short reason.
        reason -> Text,
        /// Longer account.
        description -> Nullable<Text>,
        /// Adjudication status.
        #[max_length = 20]
        status -> Varchar,
        /// Resolution text.
        resolution -> Nullable<Text>,
        /// Applied resolution action.
        #[max_length = 30]
        action -> Nullable<Varchar>,
        /// Internal admin notes.
        admin_notes -> Nullable<Text>,
        /// Adjudicating admin.
        reviewed_by -> Nullable<Uuid>,
        /// Adjudication timestamp.
        resolved_at -> Nullable<Timestamptz>,
        /// Filing timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optimistic concurrency revision.
        revision -> Int8,
    }
}
