//! Course resolution for attendance entries.
//!
//! Order: id already on the entry, then meet-link lookup by meeting code,
//! then the course code encoded in the last name. Entries that resolve to
//! nothing are kept and reported as uncategorized.

use chrono::NaiveDate;

use crate::course_code::extract_course_code;
use crate::model::{AttendanceEntry, CourseIndex, CourseMeta, Diagnostic, Resolution};

/// Options for [`resolve_courses`].
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Only courses created on or after this date take part in meet-link
    /// lookup. The comparison is on calendar dates, so a course created at
    /// any time on the start date itself is included.
    pub since: Option<NaiveDate>,
}

/// Augmented entries, the resolution of each (same order), and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ResolveOutput {
    pub entries: Vec<AttendanceEntry>,
    pub resolutions: Vec<Resolution>,
    pub diagnostics: Vec<Diagnostic>,
}

/// First course (ascending id) whose meet link contains `meeting_code`.
pub fn course_for_meeting<'a>(
    meeting_code: &str,
    courses: &'a CourseIndex,
    since: Option<NaiveDate>,
) -> Option<&'a CourseMeta> {
    if meeting_code.trim().is_empty() {
        return None;
    }
    courses.values().find(|course| {
        let Some(link) = course.meet_link.as_deref() else {
            return false;
        };
        if !link.contains(meeting_code) {
            return false;
        }
        match (since, course.created_on()) {
            (Some(since), Some(created)) => created >= since,
            // Unknown creation time: don't exclude.
            _ => true,
        }
    })
}

/// Resolve one entry in place.
pub fn resolve_entry(
    entry: &mut AttendanceEntry,
    courses: &CourseIndex,
    options: &ResolveOptions,
) -> Resolution {
    let provided = entry
        .course_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    if let Some(id) = provided {
        if entry.course.is_none() {
            entry.course = courses.get(&id).and_then(|c| c.description.clone());
        }
        entry.course_id = Some(id);
        return Resolution::Provided;
    }

    if let Some(course) = course_for_meeting(&entry.meeting_code, courses, options.since) {
        entry.course_id = Some(course.id.clone());
        entry.course = course.description.clone();
        return Resolution::MeetLink;
    }

    let code = entry.last_name.as_deref().and_then(extract_course_code);
    if let Some(code) = code {
        log::debug!(
            "meeting {}: derived course code {code} from last name",
            entry.meeting_code
        );
        entry.course = courses.get(&code).and_then(|c| c.description.clone());
        entry.course_id = Some(code);
        return Resolution::CourseCode;
    }

    entry.course_id = None;
    Resolution::Uncategorized
}

/// Resolve every entry. Never drops an entry.
pub fn resolve_courses(
    attendance: &[AttendanceEntry],
    courses: &CourseIndex,
    options: &ResolveOptions,
) -> ResolveOutput {
    let mut out = ResolveOutput::default();

    for entry in attendance {
        let mut entry = entry.clone();
        let resolution = resolve_entry(&mut entry, courses, options);
        if resolution == Resolution::Uncategorized {
            let diag = Diagnostic::UncategorizedRecord {
                meeting_code: entry.meeting_code.clone(),
                name: entry.display_name(),
            };
            log::warn!("{diag}");
            out.diagnostics.push(diag);
        }
        out.resolutions.push(resolution);
        out.entries.push(entry);
    }

    out
}
