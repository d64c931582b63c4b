//! Sign-in sheet → attendance entries.
//!
//! A sheet is a title plus rows of cells. The first row holds headers; each
//! later row with exactly [`SHEET_COLUMNS`] cells is one participant.

use chrono::{DateTime, NaiveDate};

use crate::error::ReconError;
use crate::model::{AttendanceEntry, Diagnostic};

/// Cells per participant row.
pub const SHEET_COLUMNS: usize = 6;

/// Word position of the meeting code in a sheet title
/// (`"Meeting records abc-defg-hij"`).
const TITLE_CODE_WORD: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct SheetOutput {
    pub entries: Vec<AttendanceEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn meeting_code_from_title(title: &str) -> Result<String, ReconError> {
    title
        .split(' ')
        .nth(TITLE_CODE_WORD)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ReconError::MissingMeetingCode { title: title.into() })
}

/// Session date from a notification mail date (`2024-05-04 23:26:18+0500`).
/// Plain `YYYY-MM-DD` and RFC 3339 are accepted too.
pub fn parse_message_date(raw: &str) -> Result<NaiveDate, ReconError> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%z")
        .map(|dt| dt.date_naive())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| ReconError::DateParse { value: raw.into() })
}

/// Build entries from already-fetched sheet rows.
pub fn parse_sheet_rows(
    title: &str,
    rows: &[Vec<String>],
    date: NaiveDate,
) -> Result<SheetOutput, ReconError> {
    let meeting_code = meeting_code_from_title(title)?;
    let mut out = SheetOutput::default();

    let Some((headers, participants)) = rows.split_first() else {
        log::info!("sheet '{title}' is empty");
        return Ok(out);
    };

    for (i, row) in participants.iter().enumerate() {
        if row.len() != SHEET_COLUMNS {
            let diag = Diagnostic::InvalidSheetRow {
                meeting_code: meeting_code.clone(),
                // 1-based, counting the header row
                row: i + 2,
                cells: row.len(),
            };
            log::warn!("{diag}");
            out.diagnostics.push(diag);
            continue;
        }

        let mut entry = AttendanceEntry::new(meeting_code.clone(), date);
        for (header, value) in headers.iter().zip(row) {
            let value = Some(value.clone());
            match header.trim() {
                "First name" => entry.first_name = value,
                "Last name" => entry.last_name = value,
                "Email" => entry.email = value,
                "Duration" => entry.duration = value,
                "Time joined" => entry.time_joined = value,
                "Time exited" => entry.time_exited = value,
                other => log::debug!("sheet '{title}': ignoring column '{other}'"),
            }
        }

        let full = format!(
            "{} {}",
            entry.first_name.as_deref().unwrap_or("").trim(),
            entry.last_name.as_deref().unwrap_or("").trim()
        );
        let full = full.trim();
        if !full.is_empty() {
            entry.full_name = Some(full.to_string());
        }

        out.entries.push(entry);
    }

    log::info!("collected {} attendee(s) for {meeting_code}", out.entries.len());
    Ok(out)
}

/// Build entries from a sheet exported as CSV text.
pub fn load_sheet_csv(title: &str, csv_data: &str, date: NaiveDate) -> Result<SheetOutput, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::SheetParse {
            sheet: title.into(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    parse_sheet_rows(title, &rows, date)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE: &str = "Meeting records dnf-fkqv-twc";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn meeting_code_is_third_word() {
        assert_eq!(meeting_code_from_title(TITLE).unwrap(), "dnf-fkqv-twc");
        assert!(meeting_code_from_title("Meeting records").is_err());
    }

    #[test]
    fn message_date_formats() {
        assert_eq!(parse_message_date("2024-05-04 23:26:18+0500").unwrap(), date("2024-05-04"));
        assert_eq!(parse_message_date("2024-05-04T23:26:18+05:00").unwrap(), date("2024-05-04"));
        assert_eq!(parse_message_date("2024-05-04").unwrap(), date("2024-05-04"));
        assert!(parse_message_date("May 4th").is_err());
    }

    #[test]
    fn csv_sheet() {
        let csv = "\
First name,Last name,Email,Duration,Time joined,Time exited
Sanawar,Saeed,test@g.com,56 min,10:30 PM,11:25 PM
Ali,Khan,ali@g.com,12 min,10:31 PM,10:43 PM
";
        let out = load_sheet_csv(TITLE, csv, date("2024-05-04")).unwrap();
        assert_eq!(out.entries.len(), 2);
        assert!(out.diagnostics.is_empty());

        let e = &out.entries[0];
        assert_eq!(e.meeting_code, "dnf-fkqv-twc");
        assert_eq!(e.first_name.as_deref(), Some("Sanawar"));
        assert_eq!(e.last_name.as_deref(), Some("Saeed"));
        assert_eq!(e.full_name.as_deref(), Some("Sanawar Saeed"));
        assert_eq!(e.duration.as_deref(), Some("56 min"));
        assert_eq!(e.time_exited.as_deref(), Some("11:25 PM"));
        assert_eq!(e.date, date("2024-05-04"));
        assert!(e.course_id.is_none());
    }

    #[test]
    fn short_rows_are_reported() {
        let csv = "\
First name,Last name,Email,Duration,Time joined,Time exited
Sanawar,Saeed,test@g.com,56 min,10:30 PM,11:25 PM
Ali,Khan,ali@g.com
";
        let out = load_sheet_csv(TITLE, csv, date("2024-05-04")).unwrap();
        assert_eq!(out.entries.len(), 1);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::InvalidSheetRow {
                meeting_code: "dnf-fkqv-twc".into(),
                row: 3,
                cells: 3,
            }]
        );
    }

    #[test]
    fn empty_sheet() {
        let out = parse_sheet_rows(TITLE, &[], date("2024-05-04")).unwrap();
        assert!(out.entries.is_empty());
    }
}
