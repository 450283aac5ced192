//! Project/resource store boundary.

use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::models::{Allocation, AllocationSummary, Project, Resource};

use super::AllocationRequest;

/// Request/response contract of the external project and resource store.
///
/// The engine only reads snapshots and issues single-record writes; it
/// never deletes. Consistency between concurrent writers is the store's
/// concern.
pub trait AllocationStore: Debug {
    /// Fetches all resources.
    fn fetch_resources(&self) -> Result<Vec<Resource>>;

    /// Fetches all projects with their allocation lists.
    fn fetch_projects(&self) -> Result<Vec<Project>>;

    /// Creates one allocation and returns the stored record.
    fn create_allocation(&mut self, request: &AllocationRequest) -> Result<Allocation>;

    /// Sets the percentage of an existing allocation and returns the stored record.
    fn update_allocation(&mut self, allocation_id: &str, percentage: f64) -> Result<Allocation>;
}

/// In-memory [`AllocationStore`].
///
/// Keeps each resource's allocation summaries in step with the project
/// records on every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    resources: Vec<Resource>,
    projects: Vec<Project>,
    next_id: u64,
}

impl MemoryStore {
    /// Creates a store seeded with resources and projects.
    pub fn new(resources: Vec<Resource>, projects: Vec<Project>) -> Self {
        let mut store = Self {
            resources,
            projects,
            next_id: 1,
        };
        store.refresh_all_summaries();
        store
    }

    /// Current resources.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Current projects.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Finds an allocation record by ID.
    pub fn allocation(&self, allocation_id: &str) -> Option<&Allocation> {
        self.projects
            .iter()
            .flat_map(|p| p.resources.iter())
            .find(|a| a.id == allocation_id)
    }

    fn refresh_all_summaries(&mut self) {
        for resource in &mut self.resources {
            resource.allocations = summaries_for(&resource.id, &self.projects);
        }
    }

    fn refresh_summaries(&mut self, resource_id: &str) {
        let summaries = summaries_for(resource_id, &self.projects);
        if let Some(resource) = self.resources.iter_mut().find(|r| r.id == resource_id) {
            resource.allocations = summaries;
        }
    }
}

fn summaries_for(resource_id: &str, projects: &[Project]) -> Vec<AllocationSummary> {
    projects
        .iter()
        .filter(|p| p.has_resource(resource_id))
        .map(|p| AllocationSummary {
            project_id: p.id.clone(),
            allocation: p
                .resources
                .iter()
                .filter(|a| a.resource_id == resource_id)
                .map(Allocation::percentage)
                .sum(),
        })
        .collect()
}

impl AllocationStore for MemoryStore {
    fn fetch_resources(&self) -> Result<Vec<Resource>> {
        Ok(self.resources.clone())
    }

    fn fetch_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.clone())
    }

    fn create_allocation(&mut self, request: &AllocationRequest) -> Result<Allocation> {
        if !self.resources.iter().any(|r| r.id == request.resource_id) {
            return Err(Error::UnknownResource(request.resource_id.clone()));
        }
        let id = format!("alloc-{}", self.next_id);
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == request.project_id)
            .ok_or_else(|| Error::UnknownProject(request.project_id.clone()))?;

        let mut allocation = Allocation::new(
            id,
            request.resource_id.clone(),
            request.project_id.clone(),
            request.percentage,
        )
        .with_phase(request.phase.unwrap_or(project.phase));
        allocation.start_date = request.start_date;
        allocation.end_date = request.end_date;

        project.resources.push(allocation.clone());
        self.next_id += 1;
        self.refresh_summaries(&request.resource_id);
        Ok(allocation)
    }

    fn update_allocation(&mut self, allocation_id: &str, percentage: f64) -> Result<Allocation> {
        let record = self
            .projects
            .iter_mut()
            .flat_map(|p| p.resources.iter_mut())
            .find(|a| a.id == allocation_id)
            .ok_or_else(|| Error::UnknownAllocation(allocation_id.to_string()))?;

        *record = record.revised(percentage);
        let updated = record.clone();
        self.refresh_summaries(&updated.resource_id);
        Ok(updated)
    }
}
