//! Allocation domain models.
//!
//! Provides the record shapes exchanged with the project/resource store.
//! Field names on the wire are camelCase; enum tags are SCREAMING_SNAKE_CASE.
//!
//! # Ownership
//!
//! | Type | Owned by | Engine access |
//! |------|----------|---------------|
//! | Resource | resource store | read |
//! | Project | project store | read |
//! | Allocation | project (listed in `resources`) | read, propose updates |

mod allocation;
mod project;
mod resource;

pub use allocation::Allocation;
pub use project::{collect_allocations, Project, ProjectPhase, ProjectStatus};
pub use resource::{AllocationSummary, Resource, ResourceRole, DEFAULT_AVAILABILITY};
