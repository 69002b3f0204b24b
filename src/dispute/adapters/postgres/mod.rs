//! `PostgreSQL` adapter for report persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresReportRepository;
