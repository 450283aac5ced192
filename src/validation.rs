//! Input validation and the allocation gate.
//!
//! Two kinds of checks live here:
//!
//! - **Snapshot integrity** ([`validate_input`]): structural checks over the
//!   resource and project collections fetched from the store. Detects:
//!   - Duplicate IDs
//!   - Empty IDs
//!   - Allocations referencing unknown resources
//!   - Allocations filed under the wrong project
//!   - Negative or non-finite percentages and availabilities
//!   - Inverted date ranges
//! - **Allocation gate** ([`check_allocation`], [`validate_allocation`]):
//!   the pre-commit check run before a single allocation is created or
//!   edited. A proposed percentage is accepted iff
//!   `0 < proposed <= availability - load(other allocations)`.
//!   A failing check blocks the write; it never clamps.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Allocation, Project, Resource};
use crate::utilization::compute_load;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An entity has an empty ID.
    MissingId,
    /// An allocation references a resource that doesn't exist.
    InvalidResourceReference,
    /// An allocation's project ID differs from the project holding it.
    ProjectMismatch,
    /// A percentage or availability is negative or not a finite number.
    InvalidPercentage,
    /// A start date falls after its end date.
    InvalidDateRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a resource/project snapshot.
///
/// Checks:
/// 1. No empty or duplicate resource IDs
/// 2. No empty or duplicate project IDs
/// 3. No empty or duplicate allocation IDs (across all projects)
/// 4. Availabilities are finite and non-negative
/// 5. Allocation percentages are finite and non-negative (missing is fine)
/// 6. Every allocation references an existing resource
/// 7. Every allocation's project ID matches the project holding it
/// 8. Project and allocation date ranges are not inverted
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(resources: &[Resource], projects: &[Project]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for r in resources {
        if r.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingId,
                format!("Resource '{}' has no ID", r.name),
            ));
        } else if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }

        if !(r.availability.is_finite() && r.availability >= 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPercentage,
                format!("Resource '{}' has invalid availability {}", r.id, r.availability),
            ));
        }
    }

    let mut project_ids = HashSet::new();
    let mut allocation_ids = HashSet::new();

    for project in projects {
        if project.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingId,
                format!("Project '{}' has no ID", project.name),
            ));
        } else if !project_ids.insert(project.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate project ID: {}", project.id),
            ));
        }

        if let (Some(start), Some(end)) = (project.start_date, project.end_date) {
            if start > end {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDateRange,
                    format!("Project '{}' starts {start} after it ends {end}", project.id),
                ));
            }
        }

        for a in &project.resources {
            if a.id.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingId,
                    format!("Allocation on project '{}' has no ID", project.id),
                ));
            } else if !allocation_ids.insert(a.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate allocation ID: {}", a.id),
                ));
            }

            if a.project_id != project.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ProjectMismatch,
                    format!(
                        "Allocation '{}' names project '{}' but is held by '{}'",
                        a.id, a.project_id, project.id
                    ),
                ));
            }

            check_percentage(a, &mut errors);

            if let (Some(start), Some(end)) = a.effective_range(project) {
                if start > end {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidDateRange,
                        format!("Allocation '{}' starts {start} after it ends {end}", a.id),
                    ));
                }
            }
        }
    }

    // Resource references
    for project in projects {
        for a in &project.resources {
            if a.resource_id.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingId,
                    format!("Allocation '{}' has no resource ID", a.id),
                ));
            } else if !resource_ids.contains(a.resource_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!(
                        "Allocation '{}' references unknown resource '{}'",
                        a.id, a.resource_id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_percentage(a: &Allocation, errors: &mut Vec<ValidationError>) {
    for value in [a.percentage, a.allocation].into_iter().flatten() {
        if !(value.is_finite() && value >= 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPercentage,
                format!("Allocation '{}' has invalid percentage {value}", a.id),
            ));
            return;
        }
    }
}

/// Why the allocation gate refused a proposed percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum Rejection {
    /// The proposed percentage is zero, negative, or not a number.
    NonPositive {
        /// Proposed percentage.
        requested: f64,
    },
    /// The proposed percentage exceeds the resource's remaining capacity.
    ExceedsAvailability {
        /// Proposed percentage.
        requested: f64,
        /// Remaining capacity (may be negative when already overallocated).
        available: f64,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NonPositive { requested } => {
                write!(f, "allocation must be greater than 0% (got {requested}%)")
            }
            Rejection::ExceedsAvailability {
                requested,
                available,
            } => write!(
                f,
                "requested {requested}% exceeds available capacity of {}%",
                available.max(0.0)
            ),
        }
    }
}

/// Outcome of the allocation gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "camelCase")]
pub enum AllocationVerdict {
    /// The write may proceed.
    Accepted {
        /// Capacity left after the write.
        remaining: f64,
    },
    /// The write must be blocked.
    Rejected(Rejection),
}

impl AllocationVerdict {
    /// Whether the write may proceed.
    pub fn is_accepted(&self) -> bool {
        matches!(self, AllocationVerdict::Accepted { .. })
    }

    /// Converts into a `Result`, keeping the rejection as the error.
    pub fn into_result(self) -> Result<f64, Rejection> {
        match self {
            AllocationVerdict::Accepted { remaining } => Ok(remaining),
            AllocationVerdict::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Checks a proposed percentage against a resource's remaining capacity.
///
/// `existing` may hold records of any resource; only the target's count.
/// When editing, pass the edited record's ID as `excluding` so its current
/// value does not count against itself. When creating, pass `None`.
///
/// # Example
///
/// ```
/// use u_allocation::models::{Allocation, Resource};
/// use u_allocation::validation::check_allocation;
///
/// let r = Resource::new("R1");
/// let existing = vec![Allocation::new("A1", "R1", "P1", 90.0)];
/// assert!(!check_allocation(30.0, &r, &existing, None).is_accepted());
/// assert!(check_allocation(30.0, &r, &existing, Some("A1")).is_accepted());
/// ```
pub fn check_allocation(
    proposed: f64,
    resource: &Resource,
    existing: &[Allocation],
    excluding: Option<&str>,
) -> AllocationVerdict {
    // NaN fails `> 0.0`, so it is rejected here too.
    if !(proposed > 0.0) {
        warn!(resource_id = %resource.id, proposed, "rejected non-positive allocation");
        return AllocationVerdict::Rejected(Rejection::NonPositive {
            requested: proposed,
        });
    }

    let available = match excluding {
        Some(skip) => {
            let others: Vec<Allocation> = existing
                .iter()
                .filter(|a| a.id != skip)
                .cloned()
                .collect();
            resource.availability - compute_load(&resource.id, &others, None)
        }
        None => resource.availability - compute_load(&resource.id, existing, None),
    };

    if proposed > available {
        warn!(
            resource_id = %resource.id,
            proposed,
            available,
            "rejected allocation over capacity"
        );
        return AllocationVerdict::Rejected(Rejection::ExceedsAvailability {
            requested: proposed,
            available,
        });
    }

    AllocationVerdict::Accepted {
        remaining: available - proposed,
    }
}

/// Boolean form of [`check_allocation`]: `0 < proposed <= available`.
pub fn validate_allocation(
    proposed: f64,
    resource: &Resource,
    existing: &[Allocation],
    excluding: Option<&str>,
) -> bool {
    check_allocation(proposed, resource, existing, excluding).is_accepted()
}
