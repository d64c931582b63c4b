use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::names::split_name;

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Course id → enrolled full names. Names are not guaranteed unique.
pub type Roster = BTreeMap<String, Vec<String>>;

/// Course id → course metadata.
pub type CourseIndex = BTreeMap<String, CourseMeta>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMeta {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Videoconference join link; the meeting code is a substring of it.
    #[serde(default)]
    pub meet_link: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// RFC 3339 timestamp as reported by the classroom service.
    #[serde(default)]
    pub time_created: Option<String>,
}

impl CourseMeta {
    /// Date part of `time_created`, if it parses.
    pub fn created_on(&self) -> Option<NaiveDate> {
        let raw = self.time_created.as_deref()?;
        chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok())
    }
}

/// Already-loaded, read-only roster data handed to the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub students: Roster,
    pub courses: CourseIndex,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// One observed participant at one session.
///
/// The sheet parser always stamps `date` and `meeting_code`. Every other
/// field depends on what the sign-in sheet carried and on course
/// resolution, so it is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    #[serde(rename = "Course ID", default)]
    pub course_id: Option<String>,
    #[serde(rename = "Course", default)]
    pub course: Option<String>,
    #[serde(rename = "First name", default)]
    pub first_name: Option<String>,
    #[serde(rename = "Last name", default)]
    pub last_name: Option<String>,
    #[serde(rename = "Full name", default)]
    pub full_name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,
    #[serde(rename = "Time joined", default)]
    pub time_joined: Option<String>,
    #[serde(rename = "Time exited", default)]
    pub time_exited: Option<String>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Code", default)]
    pub meeting_code: String,
}

impl AttendanceEntry {
    pub fn new(meeting_code: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            course_id: None,
            course: None,
            first_name: None,
            last_name: None,
            full_name: None,
            email: None,
            duration: None,
            time_joined: None,
            time_exited: None,
            date,
            meeting_code: meeting_code.into(),
        }
    }

    /// The reported last name, or the one split from the full name.
    pub fn observed_last_name(&self) -> Option<String> {
        if let Some(last) = self.last_name.as_deref().map(str::trim) {
            if !last.is_empty() {
                return Some(last.to_string());
            }
        }
        let full = self.full_name.as_deref()?;
        let (_, last) = split_name(full);
        if last.is_empty() {
            None
        } else {
            Some(last)
        }
    }

    /// Display name for diagnostics.
    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref() {
            return full.trim().to_string();
        }
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        format!("{first} {last}").trim().to_string()
    }

    pub fn dedup_key(&self) -> Option<DedupKey> {
        Some(DedupKey {
            course_id: self.course_id.clone()?,
            last_name: self.observed_last_name()?,
            date: self.date,
        })
    }
}

/// Pre-loaded attendance plus whatever the loaders already flagged.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub attendance: Vec<AttendanceEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

// ---------------------------------------------------------------------------
// Absentees
// ---------------------------------------------------------------------------

/// An enrolled name with no matching attendance entry for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbsenteeEntry {
    #[serde(rename = "Course ID")]
    pub course_id: String,
    #[serde(rename = "First name")]
    pub first_name: String,
    #[serde(rename = "Last name")]
    pub last_name: String,
    #[serde(rename = "Course", default)]
    pub course: Option<String>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

impl AbsenteeEntry {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            course_id: self.course_id.clone(),
            last_name: self.last_name.trim().to_string(),
            date: self.date,
        }
    }
}

/// (course id, trimmed last name, date). No student may appear both present
/// and absent under the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DedupKey {
    pub course_id: String,
    pub last_name: String,
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Resolution + Diagnostics
// ---------------------------------------------------------------------------

/// How an attendance entry got its course id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The feed already carried a course id.
    Provided,
    MeetLink,
    CourseCode,
    Uncategorized,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provided => write!(f, "provided"),
            Self::MeetLink => write!(f, "meet_link"),
            Self::CourseCode => write!(f, "course_code"),
            Self::Uncategorized => write!(f, "uncategorized"),
        }
    }
}

/// Non-fatal condition met during a run. Never aborts reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Attendance entry with no course id; excluded from absentee grouping.
    UnresolvedCourse { meeting_code: String, name: String },
    /// Course seen in attendance but absent from the roster store.
    MissingRoster { course_id: String },
    /// Sheet row without the expected number of cells.
    InvalidSheetRow { meeting_code: String, row: usize, cells: usize },
    /// Entry kept for upload without any course id.
    UncategorizedRecord { meeting_code: String, name: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnresolvedCourse { meeting_code, name } => {
                write!(f, "attendee '{name}' in meeting {meeting_code} has no course id; skipped")
            }
            Self::MissingRoster { course_id } => {
                write!(f, "no roster for course {course_id}, recommend regeneration")
            }
            Self::InvalidSheetRow { meeting_code, row, cells } => {
                write!(f, "meeting {meeting_code}, row {row}: expected 6 cells, found {cells}")
            }
            Self::UncategorizedRecord { meeting_code, name } => {
                write!(f, "attendee '{name}' in meeting {meeting_code} is uncategorized")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub attendance_entries: usize,
    pub provided: usize,
    pub via_meet_link: usize,
    pub via_course_code: usize,
    pub uncategorized: usize,
    pub sessions: usize,
    pub absentees: usize,
    pub skipped_courses: usize,
    pub diagnostics: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub attendance: Vec<AttendanceEntry>,
    pub absentees: Vec<AbsenteeEntry>,
    pub diagnostics: Vec<Diagnostic>,
}
