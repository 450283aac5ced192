//! Single-allocation write request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ProjectPhase;

/// Request to create one allocation (`{resourceId, projectId, percentage}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    /// Resource to commit.
    pub resource_id: String,
    /// Receiving project.
    pub project_id: String,
    /// Percentage to commit.
    pub percentage: f64,
    /// Optional first day.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Optional last day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Optional phase tag; the project's phase when `None`.
    #[serde(default)]
    pub phase: Option<ProjectPhase>,
}

impl AllocationRequest {
    /// Creates a request.
    pub fn new(
        resource_id: impl Into<String>,
        project_id: impl Into<String>,
        percentage: f64,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            project_id: project_id.into(),
            percentage,
            start_date: None,
            end_date: None,
            phase: None,
        }
    }

    /// Sets the date range.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Sets the phase tag.
    pub fn with_phase(mut self, phase: ProjectPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Rejects malformed requests before any capacity check.
    ///
    /// A zero percentage is well-formed; the allocation gate refuses it.
    pub fn check_shape(&self) -> Result<()> {
        if self.resource_id.is_empty() {
            return Err(Error::MissingResourceId);
        }
        if self.project_id.is_empty() {
            return Err(Error::MissingProjectId);
        }
        check_percentage(&self.resource_id, self.percentage)
    }
}

/// Rejects NaN, infinite and negative percentages.
pub(crate) fn check_percentage(id: &str, percentage: f64) -> Result<()> {
    if !percentage.is_finite() {
        return Err(Error::NonFinitePercentage(id.to_string()));
    }
    if percentage < 0.0 {
        return Err(Error::NegativePercentage {
            id: id.to_string(),
            percentage,
        });
    }
    Ok(())
}
