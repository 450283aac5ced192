//! Resource model.
//!
//! Resources are the team members whose capacity is committed to projects.
//! Each resource has a role, a team, a total availability (percentage of
//! capacity, typically 100) and, as reported by the resource store, a list
//! of per-project allocation summaries.
//!
//! The engine never persists resources; it reads them and proposes
//! allocation changes.

use serde::{Deserialize, Serialize};

/// Default assignable capacity of a resource (percent).
pub const DEFAULT_AVAILABILITY: f64 = 100.0;

/// A team member whose capacity is allocated to projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Short alias (login, handle).
    #[serde(default)]
    pub alias: String,
    /// Role within the team.
    #[serde(default)]
    pub role: ResourceRole,
    /// Team name.
    #[serde(default)]
    pub team: String,
    /// Total assignable capacity (percent, default 100).
    #[serde(default = "default_availability")]
    pub availability: f64,
    /// Per-project allocation summaries as reported by the resource store.
    #[serde(default)]
    pub allocations: Vec<AllocationSummary>,
}

/// Role of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceRole {
    /// Project manager.
    ProjectManager,
    /// Software developer.
    #[default]
    Developer,
    /// UI/UX designer.
    Designer,
    /// Quality assurance engineer.
    QaEngineer,
    /// DevOps engineer.
    DevopsEngineer,
    /// Business analyst.
    BusinessAnalyst,
    /// Role reported by the store that is not one of the known roles.
    #[serde(untagged)]
    Custom(String),
}

/// A resource-side view of one project commitment (`{projectId, allocation}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummary {
    /// Project the capacity is committed to.
    pub project_id: String,
    /// Committed percentage.
    #[serde(default)]
    pub allocation: f64,
}

fn default_availability() -> f64 {
    DEFAULT_AVAILABILITY
}

impl Resource {
    /// Creates a resource with full (100%) availability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            alias: String::new(),
            role: ResourceRole::default(),
            team: String::new(),
            availability: DEFAULT_AVAILABILITY,
            allocations: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: ResourceRole) -> Self {
        self.role = role;
        self
    }

    /// Sets the team name.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    /// Sets the total availability (percent).
    pub fn with_availability(mut self, availability: f64) -> Self {
        self.availability = availability;
        self
    }

    /// Adds a per-project allocation summary.
    pub fn with_summary(mut self, project_id: impl Into<String>, allocation: f64) -> Self {
        self.allocations.push(AllocationSummary {
            project_id: project_id.into(),
            allocation,
        });
        self
    }

    /// Sum of the store-reported allocation summaries.
    pub fn summary_load(&self) -> f64 {
        self.allocations.iter().map(|a| a.allocation).sum()
    }

    /// Committed percentage for one project (0.0 if not allocated).
    pub fn summary_for(&self, project_id: &str) -> f64 {
        self.allocations
            .iter()
            .find(|a| a.project_id == project_id)
            .map(|a| a.allocation)
            .unwrap_or(0.0)
    }

    /// Whether the resource has a summary entry for a project.
    pub fn is_assigned_to(&self, project_id: &str) -> bool {
        self.allocations.iter().any(|a| a.project_id == project_id)
    }
}

impl ResourceRole {
    /// Known roles in display order.
    pub const KNOWN: [ResourceRole; 6] = [
        ResourceRole::ProjectManager,
        ResourceRole::Developer,
        ResourceRole::Designer,
        ResourceRole::QaEngineer,
        ResourceRole::DevopsEngineer,
        ResourceRole::BusinessAnalyst,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            ResourceRole::ProjectManager => "Project Manager",
            ResourceRole::Developer => "Developer",
            ResourceRole::Designer => "Designer",
            ResourceRole::QaEngineer => "QA Engineer",
            ResourceRole::DevopsEngineer => "DevOps Engineer",
            ResourceRole::BusinessAnalyst => "Business Analyst",
            ResourceRole::Custom(name) => name.as_str(),
        }
    }
}
