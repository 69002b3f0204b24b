//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with embedded applicant pool and agreement.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning poster.
        poster_id -> Uuid,
        /// Assigned worker.
        assigned_to -> Nullable<Uuid>,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Task description.
        description -> Nullable<Text>,
        /// Search method.
        #[max_length = 20]
        search_method -> Varchar,
        /// Lifecycle status.
        #[max_length = 30]
        status -> Varchar,
        /// Applicant pool as a JSON array.
        applicants -> Jsonb,
        /// Agreement as a JSON object.
        agreement -> Nullable<Jsonb>,
        /// Budget in minor units.
        budget -> Int8,
        /// Payment provider status.
        #[max_length = 20]
        payment_status -> Varchar,
        /// Poster's cancellation reason.
        cancellation_reason -> Nullable<Text>,
        /// Completion approval timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Cancellation timestamp.
        cancelled_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optimistic concurrency revision.
        revision -> Int8,
    }
}

diesel::table! {
    /// Balance-relevant user columns.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Withdrawable balance in minor units.
        balance -> Int8,
        /// Lifetime earnings in minor units.
        total_earnings -> Int8,
        /// Settled task count.
        completed_tasks -> Int4,
        /// Identity verification flag.
        is_verified -> Bool,
    }
}

diesel::table! {
    /// Notification records.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Recipient user.
        user_id -> Uuid,
        /// Short title.
        #[max_length = 200]
        title -> Varchar,
        /// Message body.
        message -> Text,
        /// Notification category.
        #[max_length = 50]
        kind -> Varchar,
        /// Related task or report.
        related_id -> Uuid,
        /// Read flag.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
