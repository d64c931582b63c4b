//! Upload dedup: no student is reported both present and absent.

use std::collections::HashSet;

use crate::model::{AbsenteeEntry, AttendanceEntry, DedupKey};

/// Drop absentees whose (course id, trimmed last name, date) key is also an
/// attendance key. Order is preserved; two absent students sharing a last
/// name are both kept.
pub fn dedup_absentees(
    attendance: &[AttendanceEntry],
    absentees: Vec<AbsenteeEntry>,
) -> Vec<AbsenteeEntry> {
    let present: HashSet<DedupKey> = attendance.iter().filter_map(AttendanceEntry::dedup_key).collect();

    absentees
        .into_iter()
        .filter(|absentee| {
            let key = absentee.dedup_key();
            if present.contains(&key) {
                log::debug!(
                    "dropping absentee {} {} for {}: also marked present",
                    absentee.first_name,
                    absentee.last_name,
                    absentee.course_id
                );
                return false;
            }
            true
        })
        .collect()
}
