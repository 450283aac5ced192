//! Allocation planner: the engine wired to the project/resource store.
//!
//! # Operations
//!
//! 1. **Submit**: shape check → fetch snapshot → allocation gate → create.
//! 2. **Edit**: same, with the edited record excluded from the load.
//! 3. **Rebalance**: fetch snapshot → integrity check → optimize → one
//!    update per revised record.
//! 4. **Report**: fetch snapshot → utilization report.
//!
//! Gate rejections come back as [`Error::Rejected`] and nothing is
//! written. The gate only guards the snapshot it was given; races between
//! writers are resolved by the store.

mod request;
mod store;

pub use request::AllocationRequest;
pub use store::{AllocationStore, MemoryStore};

use tracing::{info, warn};

use crate::config::AllocationPolicy;
use crate::error::{Error, Result};
use crate::models::{collect_allocations, Allocation, Project, Resource};
use crate::rebalance::{optimize_with, Rebalance};
use crate::report::UtilizationReport;
use crate::validation::{check_allocation, validate_input};

/// Runs the allocation engine against an [`AllocationStore`].
///
/// # Example
///
/// ```
/// use u_allocation::models::{Allocation, Project, Resource};
/// use u_allocation::planner::{AllocationPlanner, AllocationRequest, MemoryStore};
///
/// let store = MemoryStore::new(
///     vec![Resource::new("R1")],
///     vec![
///         Project::new("P1").with_allocation(Allocation::new("A1", "R1", "P1", 90.0)),
///         Project::new("P2"),
///     ],
/// );
/// let mut planner = AllocationPlanner::new(store);
///
/// assert!(planner.submit(&AllocationRequest::new("R1", "P2", 30.0)).is_err());
/// assert!(planner.submit(&AllocationRequest::new("R1", "P2", 10.0)).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AllocationPlanner<S> {
    store: S,
    policy: AllocationPolicy,
}

impl<S: AllocationStore> AllocationPlanner<S> {
    /// Creates a planner with the default policy.
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: AllocationPolicy::default(),
        }
    }

    /// Sets the policy.
    pub fn with_policy(mut self, policy: AllocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active policy.
    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the planner, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Gates and creates a new allocation.
    pub fn submit(&mut self, request: &AllocationRequest) -> Result<Allocation> {
        request.check_shape()?;
        let (resources, projects) = self.snapshot()?;
        let resource = find_resource(&resources, &request.resource_id)?;
        let existing = collect_allocations(&projects);

        check_allocation(request.percentage, resource, &existing, None)
            .into_result()
            .map_err(Error::Rejected)?;

        let created = self.store.create_allocation(request)?;
        info!(
            allocation_id = %created.id,
            resource_id = %created.resource_id,
            project_id = %created.project_id,
            percentage = created.percentage(),
            "allocation created"
        );
        Ok(created)
    }

    /// Gates and applies a new percentage to an existing allocation.
    pub fn edit(&mut self, allocation_id: &str, percentage: f64) -> Result<Allocation> {
        request::check_percentage(allocation_id, percentage)?;
        let (resources, projects) = self.snapshot()?;
        let existing = collect_allocations(&projects);
        let current = existing
            .iter()
            .find(|a| a.id == allocation_id)
            .ok_or_else(|| Error::UnknownAllocation(allocation_id.to_string()))?;
        let resource = find_resource(&resources, &current.resource_id)?;

        check_allocation(percentage, resource, &existing, Some(allocation_id))
            .into_result()
            .map_err(Error::Rejected)?;

        let updated = self.store.update_allocation(allocation_id, percentage)?;
        info!(allocation_id, percentage, "allocation updated");
        Ok(updated)
    }

    /// Computes a rebalance without writing it.
    pub fn plan_rebalance(&self) -> Result<Rebalance> {
        let (resources, projects) = self.snapshot()?;
        if let Err(errors) = validate_input(&resources, &projects) {
            warn!(problems = errors.len(), "snapshot failed integrity checks");
            return Err(Error::InvalidSnapshot(errors));
        }
        Ok(optimize_with(
            &self.policy,
            &resources,
            &collect_allocations(&projects),
        ))
    }

    /// Computes a rebalance and writes every revised record.
    ///
    /// Writes are issued in order; the first failing write aborts the
    /// remainder and is returned.
    pub fn rebalance(&mut self) -> Result<Rebalance> {
        let plan = self.plan_rebalance()?;
        for a in &plan.revised {
            self.store.update_allocation(&a.id, a.percentage())?;
        }
        if !plan.is_empty() {
            info!(records = plan.revised_count(), "rebalance applied");
        }
        Ok(plan)
    }

    /// Builds the utilization report for the current snapshot.
    pub fn report(&self) -> Result<UtilizationReport> {
        let (resources, projects) = self.snapshot()?;
        Ok(UtilizationReport::calculate(
            &resources,
            &projects,
            &self.policy,
        ))
    }

    fn snapshot(&self) -> Result<(Vec<Resource>, Vec<Project>)> {
        Ok((self.store.fetch_resources()?, self.store.fetch_projects()?))
    }
}

fn find_resource<'a>(resources: &'a [Resource], resource_id: &str) -> Result<&'a Resource> {
    resources
        .iter()
        .find(|r| r.id == resource_id)
        .ok_or_else(|| Error::UnknownResource(resource_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::UtilizationStatus;
    use crate::validation::Rejection;

    fn overallocated_store() -> MemoryStore {
        MemoryStore::new(
            vec![Resource::new("R1").with_name("Ada"), Resource::new("R2")],
            vec![
                Project::new("P1")
                    .with_allocation(Allocation::new("A1", "R1", "P1", 60.0))
                    .with_allocation(Allocation::new("A3", "R2", "P1", 40.0)),
                Project::new("P2").with_allocation(Allocation::new("A2", "R1", "P2", 50.0)),
            ],
        )
    }

    #[test]
    fn test_submit_accepted() {
        let mut planner = AllocationPlanner::new(overallocated_store());
        let created = planner
            .submit(&AllocationRequest::new("R2", "P2", 60.0))
            .unwrap();
        assert_eq!(created.resource_id, "R2");
        assert!((planner.store().resources()[1].summary_load() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_submit_rejected_blocks_write() {
        let mut planner = AllocationPlanner::new(overallocated_store());
        let err = planner
            .submit(&AllocationRequest::new("R2", "P2", 61.0))
            .unwrap_err();
        assert_eq!(
            err.rejection(),
            Some(&Rejection::ExceedsAvailability {
                requested: 61.0,
                available: 60.0
            })
        );
        assert_eq!(planner.store().projects()[1].allocation_count(), 1);
    }

    #[test]
    fn test_submit_zero_rejected() {
        let mut planner = AllocationPlanner::new(overallocated_store());
        let err = planner
            .submit(&AllocationRequest::new("R2", "P2", 0.0))
            .unwrap_err();
        assert!(matches!(err, Error::Rejected(Rejection::NonPositive { .. })));
    }

    #[test]
    fn test_submit_malformed() {
        let mut planner = AllocationPlanner::new(overallocated_store());
        assert_eq!(
            planner.submit(&AllocationRequest::new("", "P1", 10.0)),
            Err(Error::MissingResourceId)
        );
        assert_eq!(
            planner.submit(&AllocationRequest::new("R9", "P1", 10.0)),
            Err(Error::UnknownResource("R9".into()))
        );
    }

    #[test]
    fn test_edit_excludes_current_value() {
        let mut planner = AllocationPlanner::new(overallocated_store());
        // R2 holds only A3 (40%); raising it to 100 fits once A3 is excluded.
        let updated = planner.edit("A3", 100.0).unwrap();
        assert_eq!(updated.percentage, Some(100.0));
        assert!(planner.edit("A3", 101.0).is_err());
        assert_eq!(
            planner.edit("A9", 10.0),
            Err(Error::UnknownAllocation("A9".into()))
        );
    }

    #[test]
    fn test_rebalance_applies_updates() {
        let mut planner = AllocationPlanner::new(overallocated_store());
        let plan = planner.rebalance().unwrap();
        assert_eq!(plan.revised_count(), 2);

        let store = planner.store();
        assert_eq!(store.allocation("A1").unwrap().percentage, Some(55.0));
        assert_eq!(store.allocation("A2").unwrap().percentage, Some(45.0));
        assert_eq!(store.allocation("A3").unwrap().percentage, Some(40.0));
        assert!((store.resources()[0].summary_load() - 100.0).abs() < 1e-10);

        // Nothing left to fix.
        assert!(planner.rebalance().unwrap().is_empty());
    }

    #[test]
    fn test_plan_rebalance_does_not_write() {
        let planner = AllocationPlanner::new(overallocated_store());
        let plan = planner.plan_rebalance().unwrap();
        assert_eq!(plan.revised_count(), 2);
        assert_eq!(
            planner.store().allocation("A1").unwrap().percentage,
            Some(60.0)
        );
    }

    #[test]
    fn test_rebalance_refuses_broken_snapshot() {
        let store = MemoryStore::new(
            vec![Resource::new("R1")],
            vec![Project::new("P1").with_allocation(Allocation::new("A1", "R9", "P1", 150.0))],
        );
        let mut planner = AllocationPlanner::new(store);
        assert!(matches!(planner.rebalance(), Err(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn test_report() {
        let planner = AllocationPlanner::new(overallocated_store());
        let report = planner.report().unwrap();
        assert_eq!(report.overallocated(), vec!["R1"]);
        assert_eq!(
            report.snapshot_for("R2").unwrap().status,
            UtilizationStatus::Underutilized
        );
        // Summaries: R1 = 110, R2 = 40 → mean 75.
        assert!((report.average_utilization - 75.0).abs() < 1e-10);
    }

    #[test]
    fn test_custom_policy() {
        let planner = AllocationPlanner::new(overallocated_store())
            .with_policy(AllocationPolicy::default().with_capacity_ceiling(120.0));
        assert!(planner.plan_rebalance().unwrap().is_empty());
        assert!((planner.policy().capacity_ceiling - 120.0).abs() < 1e-10);
    }
}
