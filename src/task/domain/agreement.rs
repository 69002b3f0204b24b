//! Work agreement attached to a task by its poster.

use super::TaskDomainError;
use crate::config::TextLimits;
use crate::error::required_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clauses proposed by the poster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementTerms {
    /// Identifiers of standard platform clauses.
    pub clauses: Vec<String>,
    /// Free-text clauses written by the poster.
    pub custom_clauses: Vec<String>,
}

impl AgreementTerms {
    /// Creates terms from standard and custom clauses.
    #[must_use]
    pub fn new(
        clauses: impl IntoIterator<Item = String>,
        custom_clauses: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            clauses: clauses.into_iter().collect(),
            custom_clauses: custom_clauses.into_iter().collect(),
        }
    }
}

/// Agreement between poster and worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    clauses: Vec<String>,
    custom_clauses: Vec<String>,
    accepted_by_poster: bool,
    accepted_by_tasker: bool,
    accepted_by_poster_at: Option<DateTime<Utc>>,
    accepted_by_tasker_at: Option<DateTime<Utc>>,
}

impl Agreement {
    /// Builds a poster-accepted agreement from validated terms.
    ///
    /// Blank clauses are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TooManyCustomClauses`] or a field error
    /// when a custom clause exceeds the description limit.
    pub fn proposed_by_poster(
        terms: AgreementTerms,
        limits: &TextLimits,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let clauses = terms
            .clauses
            .iter()
            .map(|clause| clause.trim())
            .filter(|clause| !clause.is_empty())
            .map(str::to_owned)
            .collect();

        let mut custom_clauses = Vec::new();
        for clause in terms.custom_clauses.iter().filter(|c| !c.trim().is_empty()) {
            custom_clauses.push(required_text(
                "custom clause",
                clause,
                limits.max_description_length,
            )?);
        }
        if custom_clauses.len() > limits.max_custom_clauses {
            return Err(TaskDomainError::TooManyCustomClauses {
                count: custom_clauses.len(),
                max: limits.max_custom_clauses,
            });
        }

        Ok(Self {
            clauses,
            custom_clauses,
            accepted_by_poster: true,
            accepted_by_tasker: false,
            accepted_by_poster_at: Some(now),
            accepted_by_tasker_at: None,
        })
    }

    /// Returns the standard clause identifiers.
    #[must_use]
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// Returns the custom clauses.
    #[must_use]
    pub fn custom_clauses(&self) -> &[String] {
        &self.custom_clauses
    }

    /// Returns whether the poster accepted.
    #[must_use]
    pub const fn accepted_by_poster(&self) -> bool {
        self.accepted_by_poster
    }

    /// Returns whether the worker accepted.
    #[must_use]
    pub const fn accepted_by_tasker(&self) -> bool {
        self.accepted_by_tasker
    }

    /// Returns when the poster accepted.
    #[must_use]
    pub const fn accepted_by_poster_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_by_poster_at
    }

    /// Returns when the worker accepted.
    #[must_use]
    pub const fn accepted_by_tasker_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_by_tasker_at
    }

    pub(crate) fn accept_as_tasker(&mut self, now: DateTime<Utc>) {
        self.accepted_by_tasker = true;
        self.accepted_by_tasker_at = Some(now);
    }
}
