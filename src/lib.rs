//! Resource allocation accounting for the U-Engine ecosystem.
//!
//! Tracks what fraction of each team member's capacity is committed across
//! overlapping projects, detects over-commitment, and computes a corrective
//! proportional reallocation. Everything here is a pure computation over an
//! in-memory snapshot; persistence stays behind the [`planner::AllocationStore`]
//! boundary.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Resource`, `Project`, `Allocation`)
//! - **`utilization`**: Load aggregation and availability (`compute_load`)
//! - **`detection`**: Status classification and recommendations (`classify`)
//! - **`rebalance`**: Proportional scale-down of overallocated resources (`optimize`)
//! - **`validation`**: Snapshot integrity checks and the allocation gate
//! - **`report`**: Per-resource utilization snapshots and team indicators
//! - **`planner`**: Engine wired to a project/resource store
//!
//! # Pipeline
//!
//! ```text
//! allocations ─▶ utilization ─▶ detection ─▶ rebalance ─▶ store updates
//! single write ─▶ validation gate ─▶ store create/update
//! ```
//!
//! No operation caches totals: loads are recomputed from the records on
//! every call, so edits made out of band can never leave a stale figure.

pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod planner;
pub mod rebalance;
pub mod report;
pub mod utilization;
pub mod validation;

pub use config::AllocationPolicy;
pub use error::{Error, Result};
