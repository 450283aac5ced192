//! Allocation model.
//!
//! An allocation commits a percentage of one resource's capacity to one
//! project, optionally bounded by its own date range and tagged with the
//! project phase it was planned for.
//!
//! # Field Mapping
//!
//! The project store reports the committed quantity under two names:
//! `percentage` (canonical) and `allocation` (legacy). Both are accepted;
//! [`Allocation::percentage`] resolves them in that order and treats a
//! record carrying neither as contributing zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Project, ProjectPhase};

/// A commitment of a resource's capacity to a project.
///
/// The sum of a resource's allocations may exceed its availability;
/// that condition is what detection and rebalancing look for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Unique allocation identifier.
    pub id: String,
    /// Committed resource.
    pub resource_id: String,
    /// Receiving project.
    pub project_id: String,
    /// Committed percentage (canonical field).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// Committed percentage under its legacy name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<f64>,
    /// First day of the commitment. `None` = project start.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the commitment. `None` = project end.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Phase the commitment was planned for.
    #[serde(default)]
    pub phase: ProjectPhase,
}

impl Allocation {
    /// Creates an allocation with the given percentage.
    pub fn new(
        id: impl Into<String>,
        resource_id: impl Into<String>,
        project_id: impl Into<String>,
        percentage: f64,
    ) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            project_id: project_id.into(),
            percentage: Some(percentage),
            allocation: None,
            start_date: None,
            end_date: None,
            phase: ProjectPhase::default(),
        }
    }

    /// Sets the commitment's own date range.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Sets the phase tag.
    pub fn with_phase(mut self, phase: ProjectPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Committed percentage; 0.0 when the record carries none.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.percentage.or(self.allocation).unwrap_or(0.0)
    }

    /// Returns a copy with a new committed percentage, all other fields kept.
    ///
    /// A legacy `allocation` field is kept in step so both names report
    /// the same quantity.
    pub fn revised(&self, percentage: f64) -> Self {
        let mut next = self.clone();
        next.percentage = Some(percentage);
        if next.allocation.is_some() {
            next.allocation = Some(percentage);
        }
        next
    }

    /// Effective date range, falling back to the owning project's dates.
    pub fn effective_range(&self, project: &Project) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (
            self.start_date.or(project.start_date),
            self.end_date.or(project.end_date),
        )
    }

    /// Whether the commitment covers a given day.
    ///
    /// An open bound (no own date and no project date) is unbounded.
    pub fn is_active_on(&self, date: NaiveDate, project: &Project) -> bool {
        let (start, end) = self.effective_range(project);
        start.map_or(true, |s| s <= date) && end.map_or(true, |e| date <= e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percentage_resolution() {
        let a = Allocation::new("A1", "R1", "P1", 40.0);
        assert!((a.percentage() - 40.0).abs() < 1e-10);

        let mut legacy = a.clone();
        legacy.percentage = None;
        legacy.allocation = Some(25.0);
        assert!((legacy.percentage() - 25.0).abs() < 1e-10);

        legacy.allocation = None;
        assert!((legacy.percentage() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_revised_keeps_other_fields() {
        let a = Allocation::new("A1", "R1", "P1", 60.0)
            .with_dates(date(2024, 1, 1), date(2024, 2, 1))
            .with_phase(ProjectPhase::Maintenance);
        let r = a.revised(55.0);
        assert_eq!(r.id, "A1");
        assert_eq!(r.project_id, "P1");
        assert_eq!(r.start_date, a.start_date);
        assert_eq!(r.phase, ProjectPhase::Maintenance);
        assert_eq!(r.percentage, Some(55.0));
        assert_eq!(r.allocation, None);
    }

    #[test]
    fn test_revised_keeps_legacy_field_in_step() {
        let mut a = Allocation::new("A1", "R1", "P1", 60.0);
        a.allocation = Some(60.0);
        let r = a.revised(45.0);
        assert_eq!(r.allocation, Some(45.0));
    }

    #[test]
    fn test_effective_range_falls_back_to_project() {
        let project = Project::new("P1").with_dates(date(2024, 1, 1), date(2024, 6, 30));
        let own = Allocation::new("A1", "R1", "P1", 50.0)
            .with_dates(date(2024, 2, 1), date(2024, 3, 1));
        let inherited = Allocation::new("A2", "R1", "P1", 50.0);

        assert_eq!(
            own.effective_range(&project),
            (Some(date(2024, 2, 1)), Some(date(2024, 3, 1)))
        );
        assert_eq!(
            inherited.effective_range(&project),
            (Some(date(2024, 1, 1)), Some(date(2024, 6, 30)))
        );
    }

    #[test]
    fn test_is_active_on() {
        let project = Project::new("P1").with_dates(date(2024, 1, 1), date(2024, 6, 30));
        let a = Allocation::new("A1", "R1", "P1", 50.0)
            .with_dates(date(2024, 2, 1), date(2024, 3, 1));

        assert!(a.is_active_on(date(2024, 2, 1), &project));
        assert!(a.is_active_on(date(2024, 3, 1), &project));
        assert!(!a.is_active_on(date(2024, 1, 31), &project));
        assert!(!a.is_active_on(date(2024, 3, 2), &project));

        let open = Allocation::new("A2", "R1", "P0", 10.0);
        assert!(open.is_active_on(date(1999, 1, 1), &Project::new("P0")));
    }

    #[test]
    fn test_both_field_names_in_one_record() {
        let json = r#"{"id":"A1","resourceId":"R1","projectId":"P1","percentage":30,"allocation":30}"#;
        let a: Allocation = serde_json::from_str(json).unwrap();
        assert!((a.percentage() - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_percentage_deserializes() {
        let json = r#"{"id":"A1","resourceId":"R1","projectId":"P1"}"#;
        let a: Allocation = serde_json::from_str(json).unwrap();
        assert_eq!(a.percentage, None);
        assert!((a.percentage() - 0.0).abs() < 1e-10);
        assert_eq!(a.phase, ProjectPhase::Planning);
    }
}
