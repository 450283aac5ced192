//! Utilization aggregation.
//!
//! Computes how much of a resource's capacity is committed, always as a
//! pure function of the allocation records passed in.
//!
//! # Queries
//!
//! | Query | Definition |
//! |-------|-----------|
//! | Load | Sum of the resource's allocation percentages |
//! | Scoped load | Load restricted to one project |
//! | Dated load | Load restricted to records active on a day |
//! | Available | availability - load (may be negative) |
//! | Assignable | max(0, available), for display |

mod index;
mod load;

pub use index::AllocationIndex;
pub use load::{
    assignable, available, available_resources, compute_load, compute_load_on,
    project_breakdown, LoadBreakdown, ProjectLoad,
};
