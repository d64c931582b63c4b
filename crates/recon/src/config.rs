use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ReconError;
use crate::resolve::ResolveOptions;
use crate::sheet::{meeting_code_from_title, parse_message_date};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    pub name: String,
    pub roster: RosterConfig,
    pub attendance: AttendanceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Where the roster snapshot lives and which courses count.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterConfig {
    /// Directory holding `students.json` and `courses.json`.
    pub data_dir: String,
    /// Classes start date. Courses created earlier are ignored for
    /// meet-link resolution.
    #[serde(default)]
    pub since: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Attendance sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttendanceConfig {
    /// JSON files, each a list of attendance records keyed like the feed.
    #[serde(default)]
    pub records: Vec<String>,
    #[serde(default)]
    pub sheets: Vec<SheetSource>,
}

/// A sign-in sheet exported as CSV.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetSource {
    pub file: String,
    /// Sheet title; its third word is the meeting code.
    pub title: String,
    /// Mail date of the notification that delivered the sheet.
    pub date: String,
}

impl SheetSource {
    pub fn session_date(&self) -> Result<NaiveDate, ReconError> {
        parse_message_date(&self.date)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Full result as JSON.
    #[serde(default)]
    pub json: Option<String>,
    /// CRM records, one JSON object per line.
    #[serde(default)]
    pub crm: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        if self.roster.data_dir.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "roster.data_dir must not be empty".into(),
            ));
        }

        if self.attendance.records.is_empty() && self.attendance.sheets.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one attendance source (records or sheets) is required".into(),
            ));
        }

        for sheet in &self.attendance.sheets {
            meeting_code_from_title(&sheet.title).map_err(|e| {
                ReconError::ConfigValidation(format!("sheet '{}': {e}", sheet.file))
            })?;
            sheet.session_date().map_err(|e| {
                ReconError::ConfigValidation(format!("sheet '{}': {e}", sheet.file))
            })?;
        }

        Ok(())
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions { since: self.roster.since }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Evening cohort"

[roster]
data_dir = "data"
since = "2024-04-01"

[attendance]
records = ["feed.json"]

[[attendance.sheets]]
file = "dnf.csv"
title = "Meeting records dnf-fkqv-twc"
date = "2024-05-04 23:26:18+0500"

[output]
json = "result.json"
crm = "crm.jsonl"
"#;

    #[test]
    fn parse_valid() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Evening cohort");
        assert_eq!(config.roster.data_dir, "data");
        assert_eq!(config.roster.since.unwrap().to_string(), "2024-04-01");
        assert_eq!(config.attendance.records, vec!["feed.json"]);
        assert_eq!(config.attendance.sheets.len(), 1);
        assert_eq!(
            config.attendance.sheets[0].session_date().unwrap().to_string(),
            "2024-05-04"
        );
        assert_eq!(config.output.crm.as_deref(), Some("crm.jsonl"));
        assert_eq!(config.resolve_options().since, config.roster.since);
    }

    #[test]
    fn output_defaults_to_none() {
        let input = r#"
name = "Minimal"
[roster]
data_dir = "data"
[attendance]
records = ["feed.json"]
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert!(config.output.json.is_none());
        assert!(config.output.crm.is_none());
        assert!(config.roster.since.is_none());
    }

    #[test]
    fn reject_no_attendance_source() {
        let input = r#"
name = "Empty"
[roster]
data_dir = "data"
[attendance]
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("at least one attendance source"));
    }

    #[test]
    fn reject_sheet_without_meeting_code() {
        let input = r#"
name = "Bad sheet"
[roster]
data_dir = "data"
[[attendance.sheets]]
file = "x.csv"
title = "Attendance"
date = "2024-05-04"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("'x.csv'"));
    }

    #[test]
    fn reject_bad_sheet_date() {
        let input = r#"
name = "Bad date"
[roster]
data_dir = "data"
[[attendance.sheets]]
file = "x.csv"
title = "Meeting records abc-defg-hij"
date = "yesterday"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn reject_unknown_field() {
        let input = r#"
name = "Typo"
[roster]
data_dir = "data"
sinse = "2024-04-01"
[attendance]
records = ["feed.json"]
"#;
        assert!(ReconConfig::from_toml(input).is_err());
    }
}
