use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Completion state of a single assignment. Closed set; the UI offers these
/// three values in a dropdown and nothing else ever reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Due-date highlight band for a non-completed assignment, relative to a
/// reference date. Completed assignments always classify as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueBand {
    Overdue,
    DueSoon,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub status: AssignmentStatus,
}

impl Assignment {
    pub fn new(title: String, due_date: NaiveDate, status: AssignmentStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            due_date,
            status,
        }
    }

    /// Calendar-day classification: strictly past dates are overdue, dates
    /// within the next three days (today included) are due soon.
    pub fn due_band(&self, today: NaiveDate) -> DueBand {
        if self.status == AssignmentStatus::Completed {
            return DueBand::Normal;
        }
        let days = (self.due_date - today).num_days();
        if days < 0 {
            DueBand::Overdue
        } else if days <= 3 {
            DueBand::DueSoon
        } else {
            DueBand::Normal
        }
    }

    /// True when the assignment is open and due exactly one calendar day
    /// after `today`. Drives the reminder scan.
    pub fn due_tomorrow(&self, today: NaiveDate) -> bool {
        self.status != AssignmentStatus::Completed && (self.due_date - today).num_days() == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub assignments: Vec<Assignment>,
}

impl Course {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            assignments: Vec::new(),
        }
    }

    /// Percentage of assignments marked completed, in `[0, 100]`.
    /// A course without assignments reports 0.
    pub fn progress(&self) -> f64 {
        if self.assignments.is_empty() {
            return 0.0;
        }
        let completed = self
            .assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Completed)
            .count();
        completed as f64 / self.assignments.len() as f64 * 100.0
    }

    pub fn assignment(&self, id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    pub fn assignment_mut(&mut self, id: &str) -> Option<&mut Assignment> {
        self.assignments.iter_mut().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assignment(due: NaiveDate, status: AssignmentStatus) -> Assignment {
        Assignment::new("HW".to_string(), due, status)
    }

    #[test]
    fn progress_is_zero_for_empty_course() {
        let course = Course::new("Algorithms".to_string());
        assert_eq!(course.progress(), 0.0);
    }

    #[test]
    fn progress_counts_completed_fraction() {
        let mut course = Course::new("Algorithms".to_string());
        let due = date(2025, 10, 1);
        course
            .assignments
            .push(assignment(due, AssignmentStatus::Completed));
        course
            .assignments
            .push(assignment(due, AssignmentStatus::InProgress));
        course
            .assignments
            .push(assignment(due, AssignmentStatus::NotStarted));
        course
            .assignments
            .push(assignment(due, AssignmentStatus::NotStarted));
        assert_eq!(course.progress(), 25.0);
    }

    #[test]
    fn progress_is_full_when_all_completed() {
        let mut course = Course::new("Algorithms".to_string());
        let due = date(2025, 10, 1);
        for _ in 0..3 {
            course
                .assignments
                .push(assignment(due, AssignmentStatus::Completed));
        }
        assert_eq!(course.progress(), 100.0);
    }

    #[test]
    fn due_band_boundaries() {
        let today = date(2025, 10, 10);
        let open = |due| assignment(due, AssignmentStatus::InProgress);

        assert_eq!(open(date(2025, 10, 9)).due_band(today), DueBand::Overdue);
        assert_eq!(open(date(2025, 10, 10)).due_band(today), DueBand::DueSoon);
        assert_eq!(open(date(2025, 10, 13)).due_band(today), DueBand::DueSoon);
        assert_eq!(open(date(2025, 10, 14)).due_band(today), DueBand::Normal);
    }

    #[test]
    fn completed_assignment_is_never_flagged() {
        let today = date(2025, 10, 10);
        let done = assignment(date(2025, 10, 1), AssignmentStatus::Completed);
        assert_eq!(done.due_band(today), DueBand::Normal);
        assert!(!done.due_tomorrow(date(2025, 9, 30)));
    }

    #[test]
    fn due_tomorrow_is_exact() {
        let today = date(2025, 10, 10);
        let open = |due| assignment(due, AssignmentStatus::NotStarted);
        assert!(open(date(2025, 10, 11)).due_tomorrow(today));
        assert!(!open(date(2025, 10, 10)).due_tomorrow(today));
        assert!(!open(date(2025, 10, 12)).due_tomorrow(today));
    }

    #[test]
    fn assignment_serializes_with_iso_date() {
        let a = Assignment::new(
            "HW1".to_string(),
            date(2025, 10, 11),
            AssignmentStatus::NotStarted,
        );
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["dueDate"], "2025-10-11");
        assert_eq!(v["status"], "not_started");
    }
}
