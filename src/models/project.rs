//! Project model.
//!
//! A project owns an ordered list of allocation records: the commitments
//! of resources' capacity to this project. Projects are owned by the
//! external project store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Allocation;

/// A project to which resource capacity is allocated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Lifecycle phase.
    #[serde(default)]
    pub phase: ProjectPhase,
    /// Delivery status.
    #[serde(default)]
    pub status: ProjectStatus,
    /// First day of the project.
    pub start_date: Option<NaiveDate>,
    /// Last day of the project.
    pub end_date: Option<NaiveDate>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Resource allocations for this project, in store order.
    #[serde(default)]
    pub resources: Vec<Allocation>,
}

/// Project lifecycle phase.
///
/// Ordering follows the declared variant order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectPhase {
    /// Scoping and staffing.
    #[default]
    Planning,
    /// Actively executing.
    InProgress,
    /// Delivered.
    Completed,
    /// Paused.
    OnHold,
    /// Post-delivery support.
    Maintenance,
    /// Build-out.
    Development,
}

/// Delivery status reported by the project store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Not started.
    #[default]
    Planned,
    /// Under way.
    InProgress,
    /// Finished.
    Completed,
}

impl ProjectPhase {
    /// All phases in lifecycle order.
    pub const ALL: [ProjectPhase; 6] = [
        ProjectPhase::Planning,
        ProjectPhase::InProgress,
        ProjectPhase::Completed,
        ProjectPhase::OnHold,
        ProjectPhase::Maintenance,
        ProjectPhase::Development,
    ];

    /// Wire tag (e.g. `IN_PROGRESS`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPhase::Planning => "PLANNING",
            ProjectPhase::InProgress => "IN_PROGRESS",
            ProjectPhase::Completed => "COMPLETED",
            ProjectPhase::OnHold => "ON_HOLD",
            ProjectPhase::Maintenance => "MAINTENANCE",
            ProjectPhase::Development => "DEVELOPMENT",
        }
    }
}

impl Project {
    /// Creates a new project with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            phase: ProjectPhase::default(),
            status: ProjectStatus::default(),
            start_date: None,
            end_date: None,
            description: None,
            resources: Vec::new(),
        }
    }

    /// Sets the project name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the lifecycle phase.
    pub fn with_phase(mut self, phase: ProjectPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Sets the delivery status.
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the project date range.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Adds an allocation record.
    ///
    /// The record's project ID is not rewritten; input validation reports
    /// records whose project ID disagrees with their owner.
    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.resources.push(allocation);
        self
    }

    /// Number of allocation records.
    pub fn allocation_count(&self) -> usize {
        self.resources.len()
    }

    /// Whether a resource has any allocation on this project.
    pub fn has_resource(&self, resource_id: &str) -> bool {
        self.resources.iter().any(|a| a.resource_id == resource_id)
    }

    /// Project duration in days, if both dates are known.
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }
}

/// Flattens every project's allocation list into one collection.
///
/// Records keep their store order: projects in slice order, allocations
/// in each project's list order.
pub fn collect_allocations(projects: &[Project]) -> Vec<Allocation> {
    projects
        .iter()
        .flat_map(|p| p.resources.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_project_builder() {
        let p = Project::new("P1")
            .with_name("Billing revamp")
            .with_phase(ProjectPhase::Development)
            .with_status(ProjectStatus::InProgress)
            .with_dates(date(2024, 1, 1), date(2024, 3, 31))
            .with_allocation(Allocation::new("A1", "R1", "P1", 40.0));

        assert_eq!(p.id, "P1");
        assert_eq!(p.name, "Billing revamp");
        assert_eq!(p.phase, ProjectPhase::Development);
        assert_eq!(p.status, ProjectStatus::InProgress);
        assert_eq!(p.duration_days(), Some(90));
        assert_eq!(p.allocation_count(), 1);
        assert!(p.has_resource("R1"));
        assert!(!p.has_resource("R2"));
    }

    #[test]
    fn test_phase_order() {
        assert!(ProjectPhase::Planning < ProjectPhase::InProgress);
        assert!(ProjectPhase::InProgress < ProjectPhase::Completed);
        let mut sorted = ProjectPhase::ALL;
        sorted.sort();
        assert_eq!(sorted, ProjectPhase::ALL);
        assert_eq!(ProjectPhase::OnHold.as_str(), "ON_HOLD");
    }

    #[test]
    fn test_collect_allocations() {
        let projects = vec![
            Project::new("P1")
                .with_allocation(Allocation::new("A1", "R1", "P1", 60.0))
                .with_allocation(Allocation::new("A2", "R2", "P1", 20.0)),
            Project::new("P2").with_allocation(Allocation::new("A3", "R1", "P2", 50.0)),
        ];
        let all = collect_allocations(&projects);
        let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
    }

    #[test]
    fn test_project_from_store_json() {
        let json = r#"{
            "id": "P1",
            "name": "Portal",
            "phase": "IN_PROGRESS",
            "status": "IN_PROGRESS",
            "startDate": "2024-02-01",
            "endDate": "2024-06-30",
            "resources": [
                {"id": "A1", "resourceId": "R1", "projectId": "P1", "percentage": 50, "phase": "IN_PROGRESS"}
            ]
        }"#;
        let p: Project = serde_json::from_str(json).unwrap();
        assert_eq!(p.phase, ProjectPhase::InProgress);
        assert_eq!(p.start_date, Some(date(2024, 2, 1)));
        assert_eq!(p.resources.len(), 1);
        assert!((p.resources[0].percentage() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_project_without_dates() {
        let p = Project::new("P1");
        assert_eq!(p.duration_days(), None);
    }
}
