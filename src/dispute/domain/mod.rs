//! Domain model for reports and their adjudication.

mod error;
mod ids;
mod report;
mod status;

pub use error::{
    DisputeDomainError, ParseReportStatusError, ParseReporterTypeError,
    ParseResolutionActionError,
};
pub use ids::ReportId;
pub use report::{NewReport, PersistedReportData, Report, Resolution};
pub use status::{ReportStatus, ReporterType, ResolutionAction};
