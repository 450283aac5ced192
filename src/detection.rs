//! Overallocation detection.
//!
//! Classifies a resource's load against the policy thresholds and produces
//! human-readable recommendations.
//!
//! # Rules
//!
//! | Condition | Status | Recommendation |
//! |-----------|--------|----------------|
//! | load > ceiling | Overallocated | reduce workload |
//! | load < underutilized_below | Underutilized | available for more |
//! | otherwise | Balanced | none |
//! | active projects > max | (any) | consolidate |
//!
//! The project-count rule is evaluated independently of the load rule; a
//! resource can be balanced by load and still be spread too thin.
//! Status is informational: rebalancing works from the raw load value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AllocationPolicy;

/// Recommendation for a load above the capacity ceiling.
pub const OVERALLOCATED: &str = "Overallocated: Consider reducing workload.";
/// Recommendation for a load below the underutilization threshold.
pub const UNDERUTILIZED: &str = "Underutilized: Available for more projects.";
/// Recommendation for a resource spread over too many projects.
pub const TOO_MANY_PROJECTS: &str = "Working on too many projects: Consider consolidation.";

/// Load classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationStatus {
    /// Load exceeds capacity.
    Overallocated,
    /// Load within the healthy band.
    Balanced,
    /// Load below the underutilization threshold.
    Underutilized,
}

/// Display banding for a load value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadIndicator {
    /// At or below the warning threshold.
    Success,
    /// Above the warning threshold, within capacity.
    Warning,
    /// Above capacity.
    Error,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Load status.
    pub status: UtilizationStatus,
    /// Recommendations, load rule first.
    pub recommendations: Vec<String>,
}

impl UtilizationStatus {
    /// Classifies a load value by the policy thresholds.
    pub fn of(load: f64, policy: &AllocationPolicy) -> Self {
        if load > policy.capacity_ceiling {
            UtilizationStatus::Overallocated
        } else if load < policy.underutilized_below {
            UtilizationStatus::Underutilized
        } else {
            UtilizationStatus::Balanced
        }
    }

    /// Lowercase status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UtilizationStatus::Overallocated => "overallocated",
            UtilizationStatus::Balanced => "balanced",
            UtilizationStatus::Underutilized => "underutilized",
        }
    }
}

impl fmt::Display for UtilizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LoadIndicator {
    /// Bands a load value for display.
    pub fn of(load: f64, policy: &AllocationPolicy) -> Self {
        if load > policy.capacity_ceiling {
            LoadIndicator::Error
        } else if load > policy.warning_above {
            LoadIndicator::Warning
        } else {
            LoadIndicator::Success
        }
    }
}

/// Classifies a load and collects recommendations.
///
/// `active_allocations` is the number of distinct allocation records the
/// resource holds with a positive share.
///
/// # Example
///
/// ```
/// use u_allocation::AllocationPolicy;
/// use u_allocation::detection::{classify, UtilizationStatus};
///
/// let c = classify(80.0, 4, &AllocationPolicy::default());
/// assert_eq!(c.status, UtilizationStatus::Balanced);
/// assert_eq!(c.recommendations.len(), 1);
/// ```
pub fn classify(load: f64, active_allocations: usize, policy: &AllocationPolicy) -> Classification {
    let status = UtilizationStatus::of(load, policy);
    let mut recommendations = Vec::new();

    match status {
        UtilizationStatus::Overallocated => recommendations.push(OVERALLOCATED.to_string()),
        UtilizationStatus::Underutilized => recommendations.push(UNDERUTILIZED.to_string()),
        UtilizationStatus::Balanced => {}
    }

    if active_allocations > policy.max_active_allocations {
        recommendations.push(TOO_MANY_PROJECTS.to_string());
    }

    Classification {
        status,
        recommendations,
    }
}
