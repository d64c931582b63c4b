//! Absentee derivation: enrolled names with no matching attendee per session.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::model::{AbsenteeEntry, AttendanceEntry, CourseIndex, Diagnostic, Roster};
use crate::names::{last_name_of, split_name};

/// Attendance entries of one course on one date.
#[derive(Debug)]
pub struct Session<'a> {
    pub course_id: &'a str,
    pub date: NaiveDate,
    pub entries: Vec<&'a AttendanceEntry>,
}

/// Group entries by (course id, date). Entries without a course id are
/// returned separately, in input order.
pub fn group_sessions(
    attendance: &[AttendanceEntry],
) -> (Vec<Session<'_>>, Vec<&AttendanceEntry>) {
    let mut groups: BTreeMap<(&str, NaiveDate), Vec<&AttendanceEntry>> = BTreeMap::new();
    let mut unresolved = Vec::new();

    for entry in attendance {
        match entry.course_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                groups.entry((id, entry.date)).or_default().push(entry);
            }
            _ => unresolved.push(entry),
        }
    }

    let sessions = groups
        .into_iter()
        .map(|((course_id, date), entries)| Session { course_id, date, entries })
        .collect();
    (sessions, unresolved)
}

/// True if `roster_last` is a substring of any observed last name,
/// ignoring case.
pub fn is_present(roster_last: &str, observed: &[String]) -> bool {
    let needle = roster_last.trim().to_lowercase();
    !needle.is_empty()
        && observed
            .iter()
            .any(|last| last.to_lowercase().contains(&needle))
}

/// Enrolled names with no matching attendee, de-duplicated in roster order.
pub fn absent_names<'a>(enrolled: &'a [String], observed: &[String]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    enrolled
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(*name))
        .filter(|name| !is_present(&last_name_of(name), observed))
        .collect()
}

/// Absentees for every session in `attendance`, skipping courses with no
/// roster. Returns the entries plus the non-fatal conditions met.
pub fn derive_absentees_with_diagnostics(
    roster: &Roster,
    courses: &CourseIndex,
    attendance: &[AttendanceEntry],
) -> (Vec<AbsenteeEntry>, Vec<Diagnostic>) {
    let (sessions, unresolved) = group_sessions(attendance);
    let mut diagnostics = Vec::new();

    for entry in unresolved {
        let diag = Diagnostic::UnresolvedCourse {
            meeting_code: entry.meeting_code.clone(),
            name: entry.display_name(),
        };
        log::info!("{diag}");
        diagnostics.push(diag);
    }

    let mut absentees = Vec::new();
    let mut missing: HashSet<&str> = HashSet::new();

    for session in &sessions {
        let Some(enrolled) = roster.get(session.course_id) else {
            if missing.insert(session.course_id) {
                let diag = Diagnostic::MissingRoster {
                    course_id: session.course_id.to_string(),
                };
                log::warn!("{diag}");
                diagnostics.push(diag);
            }
            continue;
        };

        let observed: Vec<String> = session
            .entries
            .iter()
            .filter_map(|e| e.observed_last_name())
            .collect();

        // All entries of a session share one date; take it from the first.
        let date = session.entries.first().map_or(session.date, |e| e.date);
        let description = courses
            .get(session.course_id)
            .and_then(|c| c.description.clone());

        let absent = absent_names(enrolled, &observed);
        log::debug!(
            "course {} on {date}: {} enrolled, {} observed, {} absent",
            session.course_id,
            enrolled.len(),
            observed.len(),
            absent.len()
        );

        for name in absent {
            let (first_name, last_name) = split_name(name);
            absentees.push(AbsenteeEntry {
                course_id: session.course_id.to_string(),
                first_name,
                last_name,
                course: description.clone(),
                date,
            });
        }
    }

    (absentees, diagnostics)
}

/// Absentees for every session in `attendance`. Degenerate input (missing
/// roster, unresolved course) is logged and yields partial output.
pub fn derive_absentees(
    roster: &Roster,
    courses: &CourseIndex,
    attendance: &[AttendanceEntry],
) -> Vec<AbsenteeEntry> {
    derive_absentees_with_diagnostics(roster, courses, attendance).0
}
