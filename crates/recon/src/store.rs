//! Roster store interface.
//!
//! The reconciler never touches a store directly; callers take a
//! [`RosterSnapshot`] and hand that in.

use crate::error::ReconError;
use crate::model::{CourseIndex, CourseMeta, Roster, RosterSnapshot};

/// An incremental roster update. Incoming keys overwrite, others are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterBatch {
    CourseBatch(Vec<CourseMeta>),
    StudentBatch { course_id: String, names: Vec<String> },
}

impl RosterBatch {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::CourseBatch(courses) => courses.is_empty(),
            Self::StudentBatch { names, .. } => names.is_empty(),
        }
    }
}

pub trait RosterStore {
    /// Enrolled names for a course.
    fn get(&self, course_id: &str) -> Option<Vec<String>>;

    fn course(&self, course_id: &str) -> Option<CourseMeta>;

    fn merge(&mut self, batch: RosterBatch) -> Result<(), ReconError>;

    fn snapshot(&self) -> RosterSnapshot;
}

/// Apply a batch to in-memory maps. Shared by every store implementation.
pub fn apply_batch(students: &mut Roster, courses: &mut CourseIndex, batch: RosterBatch) {
    match batch {
        RosterBatch::CourseBatch(batch) => {
            for course in batch {
                courses.insert(course.id.clone(), course);
            }
        }
        RosterBatch::StudentBatch { course_id, names } => {
            students.insert(course_id, names);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRosterStore {
    snapshot: RosterSnapshot,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RosterStore for MemoryRosterStore {
    fn get(&self, course_id: &str) -> Option<Vec<String>> {
        self.snapshot.students.get(course_id).cloned()
    }

    fn course(&self, course_id: &str) -> Option<CourseMeta> {
        self.snapshot.courses.get(course_id).cloned()
    }

    fn merge(&mut self, batch: RosterBatch) -> Result<(), ReconError> {
        // Empty batches are a no-op, matching the roster generator.
        if batch.is_empty() {
            return Ok(());
        }
        let RosterSnapshot { students, courses } = &mut self.snapshot;
        apply_batch(students, courses, batch);
        Ok(())
    }

    fn snapshot(&self) -> RosterSnapshot {
        self.snapshot.clone()
    }
}
