//! Allocation policy - capacity thresholds and recommendation limits
//!
//! The fixed dashboard policy is the [`Default`]. Embedders may load a
//! different policy from JSON; keys left out keep their default value.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Thresholds used by detection, rebalancing and display banding.
///
/// # Example
///
/// ```
/// use u_allocation::AllocationPolicy;
///
/// let policy = AllocationPolicy::from_json(r#"{"maxActiveAllocations": 5}"#).unwrap();
/// assert_eq!(policy.max_active_allocations, 5);
/// assert!((policy.capacity_ceiling - 100.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllocationPolicy {
    /// Load above which a resource is overallocated, and the total the
    /// rebalancer scales back to (percent).
    pub capacity_ceiling: f64,
    /// Load below which a resource is underutilized (percent).
    pub underutilized_below: f64,
    /// Active allocations above which consolidation is recommended.
    pub max_active_allocations: usize,
    /// Load above which the display indicator turns to warning (percent).
    pub warning_above: f64,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            capacity_ceiling: 100.0,
            underutilized_below: 50.0,
            max_active_allocations: 3,
            warning_above: 80.0,
        }
    }
}

impl AllocationPolicy {
    /// Parse a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidPolicy(e.to_string()))?;
        policy.check()?;
        Ok(policy)
    }

    /// Sets the capacity ceiling.
    pub fn with_capacity_ceiling(mut self, ceiling: f64) -> Self {
        self.capacity_ceiling = ceiling;
        self
    }

    /// Sets the consolidation limit.
    pub fn with_max_active_allocations(mut self, n: usize) -> Self {
        self.max_active_allocations = n;
        self
    }

    fn check(&self) -> Result<()> {
        if !(self.capacity_ceiling.is_finite() && self.capacity_ceiling > 0.0) {
            return Err(Error::InvalidPolicy(format!(
                "capacityCeiling must be positive, got {}",
                self.capacity_ceiling
            )));
        }
        if self.underutilized_below > self.capacity_ceiling {
            return Err(Error::InvalidPolicy(format!(
                "underutilizedBelow ({}) exceeds capacityCeiling ({})",
                self.underutilized_below, self.capacity_ceiling
            )));
        }
        Ok(())
    }
}
