use crate::absentees::derive_absentees_with_diagnostics;
use crate::config::ReconConfig;
use crate::dedup::dedup_absentees;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::model::{
    AbsenteeEntry, AttendanceEntry, Diagnostic, ReconInput, ReconMeta, ReconResult, ReconSummary,
    RosterSnapshot,
};
use crate::resolve::{resolve_courses, ResolveOptions};

/// Output of one reconciliation pass, before run metadata is attached.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub attendance: Vec<AttendanceEntry>,
    pub absentees: Vec<AbsenteeEntry>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ReconSummary,
}

/// Resolve courses, derive absentees, dedup. Never fails: degenerate input
/// degrades to partial output plus diagnostics.
pub fn reconcile(
    snapshot: &RosterSnapshot,
    input: &ReconInput,
    options: &ResolveOptions,
) -> Reconciliation {
    let mut diagnostics = input.diagnostics.clone();

    let resolved = resolve_courses(&input.attendance, &snapshot.courses, options);
    diagnostics.extend(resolved.diagnostics);

    let (absentees, absentee_diags) =
        derive_absentees_with_diagnostics(&snapshot.students, &snapshot.courses, &resolved.entries);
    // Uncategorized entries were already reported during resolution.
    diagnostics.extend(
        absentee_diags
            .into_iter()
            .filter(|d| !matches!(d, Diagnostic::UnresolvedCourse { .. })),
    );

    let absentees = dedup_absentees(&resolved.entries, absentees);
    let summary = compute_summary(&resolved.entries, &resolved.resolutions, &absentees, &diagnostics);

    Reconciliation {
        attendance: resolved.entries,
        absentees,
        diagnostics,
        summary,
    }
}

/// Run reconciliation per config against an already-loaded roster snapshot.
pub fn run(config: &ReconConfig, snapshot: &RosterSnapshot, input: &ReconInput) -> ReconResult {
    log::info!(
        "reconciling '{}': {} attendance entries, {} rostered course(s)",
        config.name,
        input.attendance.len(),
        snapshot.students.len()
    );

    let recon = reconcile(snapshot, input, &config.resolve_options());

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: recon.summary,
        attendance: recon.attendance,
        absentees: recon.absentees,
        diagnostics: recon.diagnostics,
    }
}

/// Decode an attendance feed: a JSON list of records keyed like the feed.
pub fn load_attendance_json(json: &str) -> Result<Vec<AttendanceEntry>, ReconError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CourseMeta;
    use chrono::NaiveDate;

    fn snapshot() -> RosterSnapshot {
        let mut snap = RosterSnapshot::default();
        snap.students.insert(
            "C1".into(),
            vec!["Alice Smith".into(), "Bob Jones".into(), "Jean van Berg".into()],
        );
        snap.courses.insert(
            "C1".into(),
            CourseMeta {
                id: "C1".into(),
                name: "Algebra".into(),
                description: Some("Algebra I".into()),
                meet_link: Some("https://meet.google.com/abc-defg-hij".into()),
                link: None,
                time_created: Some("2024-04-02T08:00:00Z".into()),
            },
        );
        snap
    }

    #[test]
    fn load_feed_json() {
        let json = r#"[
            {"Course ID":"C1","Last name":"Smith","Date":"2024-05-01"},
            {"First name":"Bob","Last name":"Jones","Date":"2024-05-01","Code":"abc-defg-hij"}
        ]"#;
        let entries = load_attendance_json(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].meeting_code, "abc-defg-hij");
    }

    #[test]
    fn bad_feed_json() {
        let err = load_attendance_json(r#"[{"Last name":"Smith"}]"#).unwrap_err();
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn reconcile_resolves_then_derives() {
        let attendance = load_attendance_json(
            r#"[{"First name":"Alice","Last name":"Smith","Date":"2024-05-01","Code":"abc-defg-hij"}]"#,
        )
        .unwrap();
        let input = ReconInput { attendance, diagnostics: vec![] };
        let recon = reconcile(&snapshot(), &input, &ResolveOptions::default());

        assert_eq!(recon.attendance[0].course_id.as_deref(), Some("C1"));
        assert_eq!(recon.attendance[0].course.as_deref(), Some("Algebra I"));
        let absent: Vec<_> = recon.absentees.iter().map(|a| a.last_name.as_str()).collect();
        assert_eq!(absent, vec!["Jones", "Berg"]);
        assert!(recon.absentees.iter().all(|a| a.date == NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
        assert_eq!(recon.summary.via_meet_link, 1);
        assert_eq!(recon.summary.absentees, 2);
        assert!(recon.diagnostics.is_empty());
    }

    #[test]
    fn absentees_sharing_a_last_name_are_all_reported() {
        let mut snap = snapshot();
        snap.students.insert(
            "C1".into(),
            vec!["Alice Smith".into(), "Bob Jones".into(), "Rob Jones".into()],
        );
        let attendance =
            load_attendance_json(r#"[{"Course ID":"C1","Last name":"Smith","Date":"2024-05-01"}]"#).unwrap();
        let input = ReconInput { attendance, diagnostics: vec![] };
        let recon = reconcile(&snap, &input, &ResolveOptions::default());

        let absent: Vec<_> = recon
            .absentees
            .iter()
            .map(|a| format!("{} {}", a.first_name, a.last_name))
            .collect();
        assert_eq!(absent, vec!["Bob Jones", "Rob Jones"]);
    }

    #[test]
    fn padded_course_id_matches_absentee_keys() {
        let attendance = load_attendance_json(
            r#"[{"Course ID":" C1 ","Last name":"Smith","Date":"2024-05-01"}]"#,
        )
        .unwrap();
        let input = ReconInput { attendance, diagnostics: vec![] };
        let recon = reconcile(&snapshot(), &input, &ResolveOptions::default());

        assert_eq!(recon.attendance[0].course_id.as_deref(), Some("C1"));
        assert_eq!(recon.attendance[0].course.as_deref(), Some("Algebra I"));
        assert!(recon.absentees.iter().all(|a| a.course_id == "C1"));
        assert_eq!(recon.summary.sessions, 1);
    }

    #[test]
    fn uncategorized_reported_once() {
        let attendance = load_attendance_json(
            r#"[{"First name":"Zed","Last name":"Quinn","Date":"2024-05-01","Code":"zzz-zzzz-zzz"}]"#,
        )
        .unwrap();
        let input = ReconInput { attendance, diagnostics: vec![] };
        let recon = reconcile(&snapshot(), &input, &ResolveOptions::default());

        assert_eq!(recon.attendance.len(), 1);
        assert!(recon.absentees.is_empty());
        assert_eq!(recon.diagnostics.len(), 1);
        assert!(matches!(recon.diagnostics[0], Diagnostic::UncategorizedRecord { .. }));
        assert_eq!(recon.summary.uncategorized, 1);
    }
}
