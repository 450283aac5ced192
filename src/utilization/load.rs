//! Load and availability queries.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::{Allocation, Project, Resource};

/// Per-project share of one resource's load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLoad {
    /// Project ID.
    pub project_id: String,
    /// Summed percentage on that project.
    pub load: f64,
}

/// A resource's load split by project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBreakdown {
    /// Per-project loads, in first-seen order.
    pub projects: Vec<ProjectLoad>,
    /// Sum over all projects.
    pub total: f64,
}

/// Sums the committed percentage of every record belonging to a resource.
///
/// With `scope`, only records on that project are counted. Records with no
/// percentage contribute zero. The result is unbounded above: values over
/// the resource's availability are what overallocation detection consumes.
///
/// # Example
///
/// ```
/// use u_allocation::models::Allocation;
/// use u_allocation::utilization::compute_load;
///
/// let allocations = vec![
///     Allocation::new("A1", "R1", "P1", 60.0),
///     Allocation::new("A2", "R1", "P2", 50.0),
/// ];
/// assert!((compute_load("R1", &allocations, None) - 110.0).abs() < 1e-10);
/// assert!((compute_load("R1", &allocations, Some("P2")) - 50.0).abs() < 1e-10);
/// ```
pub fn compute_load(resource_id: &str, allocations: &[Allocation], scope: Option<&str>) -> f64 {
    let load: f64 = allocations
        .iter()
        .filter(|a| a.resource_id == resource_id)
        .filter(|a| scope.map_or(true, |p| a.project_id == p))
        .map(Allocation::percentage)
        .sum();
    trace!(resource_id, ?scope, load, "computed load");
    load
}

/// Load counting only records whose effective date range covers `date`.
///
/// Records fall back to their project's dates; records on a project that
/// is not in `projects` use their own dates only.
pub fn compute_load_on(
    resource_id: &str,
    allocations: &[Allocation],
    projects: &[Project],
    date: NaiveDate,
) -> f64 {
    let by_id: HashMap<&str, &Project> = projects.iter().map(|p| (p.id.as_str(), p)).collect();
    let detached = Project::new("");

    allocations
        .iter()
        .filter(|a| a.resource_id == resource_id)
        .filter(|a| {
            let project = by_id.get(a.project_id.as_str()).copied().unwrap_or(&detached);
            a.is_active_on(date, project)
        })
        .map(Allocation::percentage)
        .sum()
}

/// Remaining capacity: `availability - load`.
///
/// Negative when the resource is overallocated. Use [`assignable`] for
/// anything shown to a user.
pub fn available(resource: &Resource, allocations: &[Allocation]) -> f64 {
    resource.availability - compute_load(&resource.id, allocations, None)
}

/// Capacity left to assign, never below zero.
pub fn assignable(resource: &Resource, allocations: &[Allocation]) -> f64 {
    available(resource, allocations).max(0.0)
}

/// Splits a resource's load by project.
pub fn project_breakdown(resource_id: &str, allocations: &[Allocation]) -> LoadBreakdown {
    let mut breakdown = LoadBreakdown::default();
    for a in allocations.iter().filter(|a| a.resource_id == resource_id) {
        let pct = a.percentage();
        match breakdown
            .projects
            .iter_mut()
            .find(|p| p.project_id == a.project_id)
        {
            Some(entry) => entry.load += pct,
            None => breakdown.projects.push(ProjectLoad {
                project_id: a.project_id.clone(),
                load: pct,
            }),
        }
        breakdown.total += pct;
    }
    breakdown
}

/// Resources whose store-reported load still fits their availability.
pub fn available_resources(resources: &[Resource]) -> Vec<&Resource> {
    resources
        .iter()
        .filter(|r| r.availability - r.summary_load() >= 0.0)
        .collect()
}
