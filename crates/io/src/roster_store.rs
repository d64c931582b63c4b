//! Roster store backed by two JSON files in one directory.
//!
//! `students.json` maps course id to enrolled full names; `courses.json`
//! maps course id to course metadata. A missing or unreadable file loads as
//! empty so the first merge can create it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use rollcall_recon::model::{CourseIndex, CourseMeta, Roster, RosterSnapshot};
use rollcall_recon::store::apply_batch;
use rollcall_recon::{ReconError, RosterBatch, RosterStore};

use crate::error::FileError;

pub const STUDENTS_FILE: &str = "students.json";
pub const COURSES_FILE: &str = "courses.json";

#[derive(Debug, Clone)]
pub struct FileRosterStore {
    dir: PathBuf,
    snapshot: RosterSnapshot,
}

impl FileRosterStore {
    /// Open the store rooted at `dir`. The directory need not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let snapshot = RosterSnapshot {
            students: load_or_empty(&dir.join(STUDENTS_FILE)),
            courses: load_or_empty(&dir.join(COURSES_FILE)),
        };
        log::debug!(
            "roster store {}: {} rostered course(s), {} course record(s)",
            dir.display(),
            snapshot.students.len(),
            snapshot.courses.len()
        );
        Self { dir, snapshot }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn students_path(&self) -> PathBuf {
        self.dir.join(STUDENTS_FILE)
    }

    pub fn courses_path(&self) -> PathBuf {
        self.dir.join(COURSES_FILE)
    }

    /// Merge a batch into the file on disk.
    ///
    /// The target file is re-read first so that a concurrent writer's keys
    /// survive; only the batch's keys are overwritten.
    pub fn merge_file(&mut self, batch: RosterBatch) -> Result<(), FileError> {
        if batch.is_empty() {
            log::info!("empty roster batch, nothing to merge");
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|e| FileError::write(&self.dir, e))?;

        match batch {
            RosterBatch::CourseBatch(_) => {
                let path = self.courses_path();
                let mut courses: CourseIndex = load_or_empty(&path);
                let mut unused = Roster::new();
                let count = batch_len(&batch);
                apply_batch(&mut unused, &mut courses, batch);
                write_pretty(&path, &courses)?;
                log::info!("merged {count} course(s) into {}", path.display());
                self.snapshot.courses = courses;
            }
            RosterBatch::StudentBatch { .. } => {
                let path = self.students_path();
                let mut students: Roster = load_or_empty(&path);
                let mut unused = CourseIndex::new();
                let count = batch_len(&batch);
                apply_batch(&mut students, &mut unused, batch);
                write_pretty(&path, &students)?;
                log::info!("merged {count} student name(s) into {}", path.display());
                self.snapshot.students = students;
            }
        }
        Ok(())
    }
}

impl RosterStore for FileRosterStore {
    fn get(&self, course_id: &str) -> Option<Vec<String>> {
        self.snapshot.students.get(course_id).cloned()
    }

    fn course(&self, course_id: &str) -> Option<CourseMeta> {
        self.snapshot.courses.get(course_id).cloned()
    }

    fn merge(&mut self, batch: RosterBatch) -> Result<(), ReconError> {
        Ok(self.merge_file(batch)?)
    }

    fn snapshot(&self) -> RosterSnapshot {
        self.snapshot.clone()
    }
}

fn batch_len(batch: &RosterBatch) -> usize {
    match batch {
        RosterBatch::CourseBatch(courses) => courses.len(),
        RosterBatch::StudentBatch { names, .. } => names.len(),
    }
}

fn load_or_empty<T: DeserializeOwned + Default>(path: &Path) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("{} not found, starting empty", path.display());
            return T::default();
        }
        Err(e) => {
            log::warn!("cannot read {}: {e}; starting empty", path.display());
            return T::default();
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("{} is not valid roster JSON ({e}); starting empty", path.display());
        T::default()
    })
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), FileError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| FileError::write(path, e))?;
    fs::write(path, json).map_err(|e| FileError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn course(id: &str, meet: &str) -> CourseMeta {
        CourseMeta {
            id: id.into(),
            name: format!("Course {id}"),
            description: None,
            meet_link: Some(format!("https://meet.google.com/{meet}")),
            link: None,
            time_created: None,
        }
    }

    #[test]
    fn missing_directory_opens_empty() {
        let dir = tempdir().unwrap();
        let store = FileRosterStore::open(dir.path().join("nope"));
        assert!(store.snapshot().students.is_empty());
        assert!(store.get("C1").is_none());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(STUDENTS_FILE), "{ not json").unwrap();
        let store = FileRosterStore::open(dir.path());
        assert!(store.snapshot().students.is_empty());
    }

    #[test]
    fn merge_creates_directory_and_files() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        let mut store = FileRosterStore::open(&data);
        store
            .merge(RosterBatch::StudentBatch {
                course_id: "C1".into(),
                names: vec!["Alice Smith".into(), "Bob Jones".into()],
            })
            .unwrap();

        let written = fs::read_to_string(data.join(STUDENTS_FILE)).unwrap();
        assert!(written.contains("\n"));
        let reopened = FileRosterStore::open(&data);
        assert_eq!(
            reopened.get("C1"),
            Some(vec!["Alice Smith".to_string(), "Bob Jones".to_string()])
        );
        assert!(!data.join(COURSES_FILE).exists());
    }

    #[test]
    fn merge_keeps_keys_written_by_another_process() {
        let dir = tempdir().unwrap();
        let mut first = FileRosterStore::open(dir.path());
        let mut second = FileRosterStore::open(dir.path());

        first
            .merge(RosterBatch::CourseBatch(vec![course("C1", "abc-defg-hij")]))
            .unwrap();
        // `second` never saw C1 in memory; the merge re-reads the file.
        second
            .merge(RosterBatch::CourseBatch(vec![course("C2", "bio-bioo-bio")]))
            .unwrap();

        let reopened = FileRosterStore::open(dir.path());
        assert!(reopened.course("C1").is_some());
        assert!(reopened.course("C2").is_some());
        assert!(second.course("C1").is_some());
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut store = FileRosterStore::open(dir.path());
        store.merge(RosterBatch::CourseBatch(vec![])).unwrap();
        assert!(!dir.path().join(COURSES_FILE).exists());
    }
}
