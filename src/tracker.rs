use crate::model::{Assignment, AssignmentStatus, Course};
use crate::notify::{Notifier, Permission};
use crate::store::Store;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Controller-level failure. Validation and lookup errors only; persistence
/// is fire-and-forget and never fails an operation.
#[derive(Debug)]
pub enum TrackerError {
    /// Title was empty after trimming surrounding whitespace.
    EmptyTitle,
    CourseNotFound(String),
    AssignmentNotFound(String),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::CourseNotFound(id) => write!(f, "course not found: {id}"),
            Self::AssignmentNotFound(id) => write!(f, "assignment not found: {id}"),
        }
    }
}

impl Error for TrackerError {}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Fields of [`Assignment`] an edit submission may carry. Absent fields are
/// left unchanged.
#[derive(Debug, Default)]
pub struct AssignmentPatch {
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<AssignmentStatus>,
}

/// The application state controller.
///
/// Owns the course list, the selection, the notification permission state
/// and the set of assignment ids already reminded about. Every mutation
/// writes through to the [`Store`] and re-establishes the selection
/// invariant before returning.
pub struct Tracker {
    store: Store,
    notifier: Box<dyn Notifier>,
    courses: Vec<Course>,
    selected_course_id: Option<String>,
    permission: Permission,
    // Per-instance, not persisted: reminders are at-most-once per process.
    notified: HashSet<String>,
}

impl Tracker {
    /// Builds a controller from whatever the store holds. Loads are
    /// best-effort; a fresh or unreadable store yields an empty tracker.
    /// Permission starts undetermined, so a prompt is requested once here.
    pub fn open(store: Store, notifier: Box<dyn Notifier>, today: NaiveDate) -> Tracker {
        let courses = store.load_courses();
        let selected_course_id = store.load_selection();
        let mut tracker = Tracker {
            store,
            notifier,
            courses,
            selected_course_id,
            permission: Permission::Default,
            notified: HashSet::new(),
        };
        // A partially readable store (course entry lost, selection intact)
        // can leave the loaded selection dangling.
        tracker.sync_selection();
        if tracker.permission == Permission::Default {
            tracker.notifier.request_permission();
        }
        tracker.scan_due_tomorrow(today);
        tracker
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn selected_course_id(&self) -> Option<&str> {
        self.selected_course_id.as_deref()
    }

    pub fn set_permission(&mut self, permission: Permission, today: NaiveDate) {
        self.permission = permission;
        // Reminders already due must not wait for the next mutation.
        if permission == Permission::Granted {
            self.scan_due_tomorrow(today);
        }
    }

    /// Creates a course and makes it the selection. Returns the new id.
    pub fn add_course(&mut self, title: &str, today: NaiveDate) -> TrackerResult<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TrackerError::EmptyTitle);
        }
        let course = Course::new(title.to_string());
        let id = course.id.clone();
        self.courses.push(course);
        self.selected_course_id = Some(id.clone());
        self.persist_selection();
        self.after_courses_changed(today);
        Ok(id)
    }

    /// Retitles a course; its assignments are untouched.
    pub fn rename_course(&mut self, id: &str, title: &str, today: NaiveDate) -> TrackerResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TrackerError::EmptyTitle);
        }
        let Some(course) = self.courses.iter_mut().find(|c| c.id == id) else {
            return Err(TrackerError::CourseNotFound(id.to_string()));
        };
        course.title = title.to_string();
        self.after_courses_changed(today);
        Ok(())
    }

    /// Removes a course and, with it, all of its assignments. If it was the
    /// selection, the invariant step picks the first remaining course.
    pub fn delete_course(&mut self, id: &str, today: NaiveDate) -> TrackerResult<()> {
        let before = self.courses.len();
        self.courses.retain(|c| c.id != id);
        if self.courses.len() == before {
            return Err(TrackerError::CourseNotFound(id.to_string()));
        }
        if self.selected_course_id.as_deref() == Some(id) {
            self.selected_course_id = None;
        }
        self.after_courses_changed(today);
        Ok(())
    }

    /// Sets the selection. Unknown ids are rejected rather than stored and
    /// lazily corrected, so the selection invariant holds between calls too.
    pub fn select_course(&mut self, id: &str, today: NaiveDate) -> TrackerResult<()> {
        if !self.courses.iter().any(|c| c.id == id) {
            return Err(TrackerError::CourseNotFound(id.to_string()));
        }
        self.selected_course_id = Some(id.to_string());
        self.persist_selection();
        self.scan_due_tomorrow(today);
        Ok(())
    }

    /// Appends an assignment to a course. Returns the new id.
    pub fn add_assignment(
        &mut self,
        course_id: &str,
        title: &str,
        due_date: NaiveDate,
        status: AssignmentStatus,
        today: NaiveDate,
    ) -> TrackerResult<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TrackerError::EmptyTitle);
        }
        let Some(course) = self.courses.iter_mut().find(|c| c.id == course_id) else {
            return Err(TrackerError::CourseNotFound(course_id.to_string()));
        };
        let assignment = Assignment::new(title.to_string(), due_date, status);
        let id = assignment.id.clone();
        course.assignments.push(assignment);
        self.after_courses_changed(today);
        Ok(id)
    }

    /// Merges the provided fields into an assignment; absent fields keep
    /// their value. A provided title must still be non-empty after trimming.
    pub fn update_assignment(
        &mut self,
        course_id: &str,
        assignment_id: &str,
        patch: AssignmentPatch,
        today: NaiveDate,
    ) -> TrackerResult<()> {
        let title = match patch.title {
            Some(t) => {
                let t = t.trim().to_string();
                if t.is_empty() {
                    return Err(TrackerError::EmptyTitle);
                }
                Some(t)
            }
            None => None,
        };
        let assignment = self.find_assignment_mut(course_id, assignment_id)?;
        if let Some(t) = title {
            assignment.title = t;
        }
        if let Some(d) = patch.due_date {
            assignment.due_date = d;
        }
        if let Some(s) = patch.status {
            assignment.status = s;
        }
        self.after_courses_changed(today);
        Ok(())
    }

    pub fn delete_assignment(
        &mut self,
        course_id: &str,
        assignment_id: &str,
        today: NaiveDate,
    ) -> TrackerResult<()> {
        let Some(course) = self.courses.iter_mut().find(|c| c.id == course_id) else {
            return Err(TrackerError::CourseNotFound(course_id.to_string()));
        };
        let before = course.assignments.len();
        course.assignments.retain(|a| a.id != assignment_id);
        if course.assignments.len() == before {
            return Err(TrackerError::AssignmentNotFound(assignment_id.to_string()));
        }
        self.after_courses_changed(today);
        Ok(())
    }

    /// Sets the status directly. The value comes from a closed selector, so
    /// there is no further validation to do.
    pub fn set_assignment_status(
        &mut self,
        course_id: &str,
        assignment_id: &str,
        status: AssignmentStatus,
        today: NaiveDate,
    ) -> TrackerResult<()> {
        let assignment = self.find_assignment_mut(course_id, assignment_id)?;
        assignment.status = status;
        self.after_courses_changed(today);
        Ok(())
    }

    fn find_assignment_mut(
        &mut self,
        course_id: &str,
        assignment_id: &str,
    ) -> TrackerResult<&mut Assignment> {
        let Some(course) = self.courses.iter_mut().find(|c| c.id == course_id) else {
            return Err(TrackerError::CourseNotFound(course_id.to_string()));
        };
        course
            .assignment_mut(assignment_id)
            .ok_or_else(|| TrackerError::AssignmentNotFound(assignment_id.to_string()))
    }

    /// Post-mutation tail shared by every operation that changes the course
    /// sequence: write through, re-establish the selection invariant, then
    /// look for newly due reminders.
    fn after_courses_changed(&mut self, today: NaiveDate) {
        self.persist_courses();
        self.sync_selection();
        self.scan_due_tomorrow(today);
    }

    /// Selection invariant: the selection names an existing course, or the
    /// first course when it does not, or nothing when there are no courses.
    fn sync_selection(&mut self) {
        let next = match self.selected_course_id.as_deref() {
            Some(id) if self.courses.iter().any(|c| c.id == id) => return,
            _ => self.courses.first().map(|c| c.id.clone()),
        };
        if next != self.selected_course_id {
            self.selected_course_id = next;
            self.persist_selection();
        }
    }

    // Writes are fire-and-forget: a failed write is logged and the
    // in-memory state stays authoritative for the rest of the process.
    fn persist_courses(&self) {
        if let Err(e) = self.store.save_courses(&self.courses) {
            log::warn!("course list write failed: {e}");
        }
    }

    fn persist_selection(&self) {
        if let Err(e) = self.store.save_selection(self.selected_course_id.as_deref()) {
            log::warn!("selection write failed: {e}");
        }
    }

    /// Emits one reminder per not-yet-notified open assignment of the
    /// selected course that is due exactly tomorrow. Ids are remembered for
    /// the process lifetime, so a reminder fires at most once even if the
    /// assignment later becomes "due tomorrow" again.
    fn scan_due_tomorrow(&mut self, today: NaiveDate) {
        if self.permission != Permission::Granted {
            return;
        }
        let Some(selected) = self.selected_course_id.as_deref() else {
            return;
        };
        let Some(course) = self.courses.iter().find(|c| c.id == selected) else {
            return;
        };
        let pending: Vec<(String, String)> = course
            .assignments
            .iter()
            .filter(|a| a.due_tomorrow(today) && !self.notified.contains(&a.id))
            .map(|a| {
                (
                    a.id.clone(),
                    format!(
                        "Reminder: \"{}\" is due tomorrow in \"{}\"",
                        a.title, course.title
                    ),
                )
            })
            .collect();
        for (id, message) in pending {
            log::info!("due-tomorrow reminder for assignment {id}");
            self.notifier.show(&message);
            self.notified.insert(id);
        }
    }
}
