//! Proportional rebalancing of overallocated resources.
//!
//! # Algorithm
//!
//! For each resource whose load exceeds the capacity ceiling:
//! 1. `scale = ceiling / load` (so `0 < scale < 1`).
//! 2. Every record of that resource is revised to `round(percentage * scale)`.
//!
//! Resources at or below the ceiling produce no revised records. The output
//! is a list of updates keyed by allocation ID, not a replacement set.
//!
//! # Rounding
//!
//! Each record is rounded to the nearest whole percent, halves away from
//! zero. Drift from rounding (a revised total of e.g. 101) is accepted and
//! not corrected iteratively, so the operation is not guaranteed to be
//! idempotent. The revised total stays within `ceiling + 0.5 * n` for a
//! resource with `n` records.
//!
//! Rebalancing is date-agnostic: it scales by the resource's total load.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AllocationPolicy;
use crate::models::{Allocation, Resource};
use crate::utilization::AllocationIndex;

/// Before/after totals for one rebalanced resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAdjustment {
    /// Resource ID.
    pub resource_id: String,
    /// Load before rebalancing.
    pub load_before: f64,
    /// Sum of revised percentages.
    pub load_after: f64,
    /// Scale factor applied.
    pub scale: f64,
}

/// Result of a rebalancing pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rebalance {
    /// Revised records, grouped by resource in input resource order.
    pub revised: Vec<Allocation>,
    /// One entry per rebalanced resource.
    pub adjustments: Vec<ResourceAdjustment>,
}

impl Rebalance {
    /// Whether nothing needed rebalancing.
    pub fn is_empty(&self) -> bool {
        self.revised.is_empty()
    }

    /// Number of revised records.
    pub fn revised_count(&self) -> usize {
        self.revised.len()
    }

    /// Adjustment for one resource, if it was rebalanced.
    pub fn adjustment_for(&self, resource_id: &str) -> Option<&ResourceAdjustment> {
        self.adjustments.iter().find(|a| a.resource_id == resource_id)
    }
}

/// Scales overallocated resources back to 100% with the default policy.
///
/// # Example
///
/// ```
/// use u_allocation::models::{Allocation, Resource};
/// use u_allocation::rebalance::optimize;
///
/// let resources = vec![Resource::new("R1")];
/// let allocations = vec![
///     Allocation::new("A1", "R1", "P1", 60.0),
///     Allocation::new("A2", "R1", "P2", 50.0),
/// ];
/// let revised = optimize(&resources, &allocations);
/// assert_eq!(revised[0].percentage, Some(55.0));
/// assert_eq!(revised[1].percentage, Some(45.0));
/// ```
pub fn optimize(resources: &[Resource], allocations: &[Allocation]) -> Vec<Allocation> {
    optimize_with(&AllocationPolicy::default(), resources, allocations).revised
}

/// Scales every resource above `policy.capacity_ceiling` back to it.
pub fn optimize_with(
    policy: &AllocationPolicy,
    resources: &[Resource],
    allocations: &[Allocation],
) -> Rebalance {
    let index = AllocationIndex::new(allocations.to_vec());
    rebalance_index(policy, resources, &index)
}

/// Rebalances against a prebuilt index.
pub fn rebalance_index(
    policy: &AllocationPolicy,
    resources: &[Resource],
    index: &AllocationIndex,
) -> Rebalance {
    let ceiling = policy.capacity_ceiling;
    let mut result = Rebalance::default();

    for resource in resources {
        let load = index.load(&resource.id, None);
        if load <= ceiling || load <= 0.0 {
            continue;
        }

        let scale = ceiling / load;
        let mut load_after = 0.0;
        for a in index.for_resource(&resource.id) {
            let pct = (a.percentage() * scale).round();
            load_after += pct;
            result.revised.push(a.revised(pct));
        }

        debug!(
            resource_id = %resource.id,
            load,
            scale,
            load_after,
            "rebalanced resource"
        );
        result.adjustments.push(ResourceAdjustment {
            resource_id: resource.id.clone(),
            load_before: load,
            load_after,
            scale,
        });
    }

    if !result.is_empty() {
        info!(
            resources = result.adjustments.len(),
            records = result.revised.len(),
            "rebalance proposed"
        );
    }
    result
}
