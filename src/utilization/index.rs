//! Allocation arena indexed by resource.

use std::collections::HashMap;

use crate::models::{collect_allocations, Allocation, Project};

/// An immutable snapshot of allocation records, indexed by resource ID.
///
/// Totals are never cached: every query walks the resource's records,
/// so the index cannot drift from the records it was built over.
#[derive(Debug, Clone, Default)]
pub struct AllocationIndex {
    allocations: Vec<Allocation>,
    by_resource: HashMap<String, Vec<usize>>,
}

impl AllocationIndex {
    /// Builds an index over the given records.
    pub fn new(allocations: Vec<Allocation>) -> Self {
        let mut by_resource: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, a) in allocations.iter().enumerate() {
            by_resource
                .entry(a.resource_id.clone())
                .or_default()
                .push(idx);
        }
        Self {
            allocations,
            by_resource,
        }
    }

    /// Builds an index over every project's allocation list.
    pub fn from_projects(projects: &[Project]) -> Self {
        Self::new(collect_allocations(projects))
    }

    /// All records, in input order.
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Records belonging to one resource, in input order.
    pub fn for_resource<'a>(&'a self, resource_id: &str) -> impl Iterator<Item = &'a Allocation> {
        self.by_resource
            .get(resource_id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.allocations[idx])
    }

    /// Finds a record by allocation ID.
    pub fn get(&self, allocation_id: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.id == allocation_id)
    }

    /// Sum of one resource's percentages, optionally scoped to a project.
    pub fn load(&self, resource_id: &str, scope: Option<&str>) -> f64 {
        self.for_resource(resource_id)
            .filter(|a| scope.map_or(true, |p| a.project_id == p))
            .map(Allocation::percentage)
            .sum()
    }

    /// Number of distinct allocation records the resource holds with a
    /// positive share. Several records on one project each count.
    pub fn active_allocations(&self, resource_id: &str) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for a in self.for_resource(resource_id) {
            if a.percentage() > 0.0 && !seen.contains(&a.id.as_str()) {
                seen.push(&a.id);
            }
        }
        seen.len()
    }

    /// Resource IDs that appear in at least one record.
    pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
        self.by_resource.keys().map(String::as_str)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}
