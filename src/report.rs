//! Utilization snapshots and team-level indicators.
//!
//! Builds the per-resource projection (load, status, recommendations) and
//! the dashboard summaries derived from it. Every figure is recomputed from
//! the snapshot passed in.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Current load | Sum of the resource's allocation percentages |
//! | Average utilization | Rounded mean of store-reported resource loads |
//! | Overallocated | Resources whose load exceeds the ceiling |
//! | Phase distribution | Project count per lifecycle phase |

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AllocationPolicy;
use crate::detection::{classify, LoadIndicator, UtilizationStatus};
use crate::models::{Project, ProjectPhase, Resource};
use crate::utilization::AllocationIndex;

/// Derived view of one resource's utilization. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationSnapshot {
    /// Resource ID.
    pub resource_id: String,
    /// Resource display name.
    pub resource_name: String,
    /// Total committed load (percent).
    pub current_load: f64,
    /// Load classification.
    pub status: UtilizationStatus,
    /// Display banding.
    pub indicator: LoadIndicator,
    /// Recommendations from detection.
    pub recommendations: Vec<String>,
}

impl UtilizationSnapshot {
    /// Builds the snapshot for one resource.
    pub fn build(resource: &Resource, index: &AllocationIndex, policy: &AllocationPolicy) -> Self {
        let load = index.load(&resource.id, None);
        let classification = classify(load, index.active_allocations(&resource.id), policy);
        Self {
            resource_id: resource.id.clone(),
            resource_name: resource.name.clone(),
            current_load: load,
            status: classification.status,
            indicator: LoadIndicator::of(load, policy),
            recommendations: classification.recommendations,
        }
    }

    /// Whether the load exceeds capacity.
    pub fn is_overallocated(&self) -> bool {
        self.status == UtilizationStatus::Overallocated
    }
}

/// Count of projects in one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCount {
    /// Phase.
    pub phase: ProjectPhase,
    /// Number of projects in it.
    pub count: usize,
}

/// Utilization across a whole team snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationReport {
    /// One snapshot per resource, in resource order.
    pub snapshots: Vec<UtilizationSnapshot>,
    /// Rounded mean of store-reported resource loads (0 when empty).
    pub average_utilization: f64,
    /// Project count per phase, every phase listed.
    pub phase_distribution: Vec<PhaseCount>,
}

impl UtilizationReport {
    /// Computes the report from fetched resources and projects.
    pub fn calculate(resources: &[Resource], projects: &[Project], policy: &AllocationPolicy) -> Self {
        let index = AllocationIndex::from_projects(projects);
        let snapshots: Vec<UtilizationSnapshot> = resources
            .iter()
            .map(|r| UtilizationSnapshot::build(r, &index, policy))
            .collect();

        let over = snapshots.iter().filter(|s| s.is_overallocated()).count();
        if over > 0 {
            warn!(resources = over, "overallocated resources in snapshot");
        }

        Self {
            snapshots,
            average_utilization: average_utilization(resources),
            phase_distribution: phase_distribution(projects),
        }
    }

    /// IDs of overallocated resources.
    pub fn overallocated(&self) -> Vec<&str> {
        self.snapshots
            .iter()
            .filter(|s| s.is_overallocated())
            .map(|s| s.resource_id.as_str())
            .collect()
    }

    /// Whether any resource is overallocated.
    pub fn has_overallocation(&self) -> bool {
        self.snapshots.iter().any(|s| s.is_overallocated())
    }

    /// Snapshot for one resource.
    pub fn snapshot_for(&self, resource_id: &str) -> Option<&UtilizationSnapshot> {
        self.snapshots.iter().find(|s| s.resource_id == resource_id)
    }
}

/// Rounded mean of the resources' store-reported summary loads.
pub fn average_utilization(resources: &[Resource]) -> f64 {
    if resources.is_empty() {
        return 0.0;
    }
    let total: f64 = resources.iter().map(Resource::summary_load).sum();
    (total / resources.len() as f64).round()
}

/// Number of projects in each phase, in lifecycle order.
pub fn phase_distribution(projects: &[Project]) -> Vec<PhaseCount> {
    ProjectPhase::ALL
        .iter()
        .map(|&phase| PhaseCount {
            phase,
            count: projects.iter().filter(|p| p.phase == phase).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{OVERALLOCATED, TOO_MANY_PROJECTS, UNDERUTILIZED};
    use crate::models::Allocation;

    fn sample_projects() -> Vec<Project> {
        vec![
            Project::new("P1")
                .with_phase(ProjectPhase::InProgress)
                .with_allocation(Allocation::new("A1", "R1", "P1", 60.0))
                .with_allocation(Allocation::new("A2", "R2", "P1", 20.0)),
            Project::new("P2")
                .with_phase(ProjectPhase::InProgress)
                .with_allocation(Allocation::new("A3", "R1", "P2", 50.0))
                .with_allocation(Allocation::new("A4", "R2", "P2", 20.0)),
            Project::new("P3")
                .with_phase(ProjectPhase::Planning)
                .with_allocation(Allocation::new("A5", "R2", "P3", 20.0)),
            Project::new("P4")
                .with_phase(ProjectPhase::Completed)
                .with_allocation(Allocation::new("A6", "R2", "P4", 20.0)),
        ]
    }

    fn sample_resources() -> Vec<Resource> {
        vec![
            Resource::new("R1").with_name("Ada"),
            Resource::new("R2").with_name("Grace"),
            Resource::new("R3").with_name("Linus"),
        ]
    }

    #[test]
    fn test_snapshots() {
        let report = UtilizationReport::calculate(
            &sample_resources(),
            &sample_projects(),
            &AllocationPolicy::default(),
        );

        let ada = report.snapshot_for("R1").unwrap();
        assert_eq!(ada.resource_name, "Ada");
        assert!((ada.current_load - 110.0).abs() < 1e-10);
        assert_eq!(ada.status, UtilizationStatus::Overallocated);
        assert_eq!(ada.indicator, LoadIndicator::Error);
        assert_eq!(ada.recommendations, vec![OVERALLOCATED.to_string()]);

        // Four 20% allocations: balanced load, too many projects.
        let grace = report.snapshot_for("R2").unwrap();
        assert!((grace.current_load - 80.0).abs() < 1e-10);
        assert_eq!(grace.status, UtilizationStatus::Balanced);
        assert_eq!(grace.indicator, LoadIndicator::Success);
        assert_eq!(grace.recommendations, vec![TOO_MANY_PROJECTS.to_string()]);

        let linus = report.snapshot_for("R3").unwrap();
        assert!((linus.current_load - 0.0).abs() < 1e-10);
        assert_eq!(linus.recommendations, vec![UNDERUTILIZED.to_string()]);
    }

    #[test]
    fn test_split_allocations_count_toward_consolidation() {
        let projects = vec![
            Project::new("P1")
                .with_allocation(Allocation::new("A1", "R1", "P1", 20.0))
                .with_allocation(Allocation::new("A2", "R1", "P1", 20.0)),
            Project::new("P2")
                .with_allocation(Allocation::new("A3", "R1", "P2", 20.0))
                .with_allocation(Allocation::new("A4", "R1", "P2", 20.0)),
        ];
        let report = UtilizationReport::calculate(
            &[Resource::new("R1")],
            &projects,
            &AllocationPolicy::default(),
        );

        let snap = report.snapshot_for("R1").unwrap();
        assert!((snap.current_load - 80.0).abs() < 1e-10);
        assert_eq!(snap.status, UtilizationStatus::Balanced);
        assert!(snap
            .recommendations
            .iter()
            .any(|r| r.starts_with("Working on too many")));
    }

    #[test]
    fn test_overallocated_ids() {
        let report = UtilizationReport::calculate(
            &sample_resources(),
            &sample_projects(),
            &AllocationPolicy::default(),
        );
        assert_eq!(report.overallocated(), vec!["R1"]);
        assert!(report.has_overallocation());
    }

    #[test]
    fn test_no_overallocation() {
        let report = UtilizationReport::calculate(&sample_resources(), &[], &AllocationPolicy::default());
        assert!(!report.has_overallocation());
        assert!(report.overallocated().is_empty());
    }

    #[test]
    fn test_phase_distribution() {
        let dist = phase_distribution(&sample_projects());
        assert_eq!(dist.len(), ProjectPhase::ALL.len());
        assert_eq!(dist[0], PhaseCount { phase: ProjectPhase::Planning, count: 1 });
        assert_eq!(dist[1], PhaseCount { phase: ProjectPhase::InProgress, count: 2 });
        assert_eq!(dist[2], PhaseCount { phase: ProjectPhase::Completed, count: 1 });
        assert_eq!(dist[3].count, 0);
    }

    #[test]
    fn test_average_utilization() {
        let resources = vec![
            Resource::new("R1").with_summary("P1", 60.0).with_summary("P2", 15.0),
            Resource::new("R2").with_summary("P1", 50.0),
            Resource::new("R3"),
        ];
        // (75 + 50 + 0) / 3 = 41.67 → 42
        assert!((average_utilization(&resources) - 42.0).abs() < 1e-10);
    }

    #[test]
    fn test_average_utilization_empty() {
        assert!((average_utilization(&[]) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let report = UtilizationReport::calculate(
            &sample_resources(),
            &sample_projects(),
            &AllocationPolicy::default(),
        );
        let json = serde_json::to_value(&report.snapshots[0]).unwrap();
        assert_eq!(json["resourceId"], "R1");
        assert_eq!(json["status"], "overallocated");
        assert_eq!(json["currentLoad"], 110.0);
    }
}
