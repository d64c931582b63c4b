use std::collections::BTreeSet;

use crate::model::{AbsenteeEntry, AttendanceEntry, Diagnostic, ReconSummary, Resolution};

/// Compute summary statistics for a finished run.
pub fn compute_summary(
    attendance: &[AttendanceEntry],
    resolutions: &[Resolution],
    absentees: &[AbsenteeEntry],
    diagnostics: &[Diagnostic],
) -> ReconSummary {
    let mut summary = ReconSummary {
        attendance_entries: attendance.len(),
        absentees: absentees.len(),
        diagnostics: diagnostics.len(),
        ..ReconSummary::default()
    };

    for r in resolutions {
        match r {
            Resolution::Provided => summary.provided += 1,
            Resolution::MeetLink => summary.via_meet_link += 1,
            Resolution::CourseCode => summary.via_course_code += 1,
            Resolution::Uncategorized => summary.uncategorized += 1,
        }
    }

    summary.sessions = attendance
        .iter()
        .filter_map(|e| Some((e.course_id.as_deref()?, e.date)))
        .collect::<BTreeSet<_>>()
        .len();

    summary.skipped_courses = diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::MissingRoster { .. }))
        .count();

    summary
}
