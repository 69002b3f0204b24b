//! `PostgreSQL` notification emitter writing to the `notifications` table.

use super::{
    BlockingError, MarketPgPool, models::NewNotificationRow, run_blocking, schema::notifications,
};
use crate::task::{
    domain::NotificationIntent,
    ports::{NotificationEmitter, NotificationError},
};
use async_trait::async_trait;
use diesel::prelude::*;
use mockable::Clock;
use std::sync::Arc;
use uuid::Uuid;

/// `PostgreSQL`-backed notification emitter.
#[derive(Clone)]
pub struct PostgresNotificationEmitter<C>
where
    C: Clock + Send + Sync,
{
    pool: MarketPgPool,
    clock: Arc<C>,
}

impl<C> PostgresNotificationEmitter<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new emitter from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }
}

impl From<BlockingError> for NotificationError {
    fn from(err: BlockingError) -> Self {
        Self::new(err)
    }
}

#[async_trait]
impl<C> NotificationEmitter for PostgresNotificationEmitter<C>
where
    C: Clock + Send + Sync,
{
    async fn emit(&self, notification: &NotificationIntent) -> Result<(), NotificationError> {
        let row = NewNotificationRow {
            id: Uuid::new_v4(),
            user_id: notification.recipient.into_inner(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            kind: notification.kind.as_str().to_owned(),
            related_id: notification.related_id,
            is_read: false,
            created_at: self.clock.utc(),
        };

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(notifications::table)
                .values(&row)
                .execute(connection)
                .map_err(NotificationError::new)?;
            Ok(())
        })
        .await
    }
}
