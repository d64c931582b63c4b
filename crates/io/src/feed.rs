//! Load attendance from the files a run config names.
//!
//! Record files are JSON lists keyed like the attendance feed. Sheet files
//! are CSV exports of sign-in sheets; relative paths resolve against the
//! config's directory.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rollcall_recon::config::SheetSource;
use rollcall_recon::engine::load_attendance_json;
use rollcall_recon::model::{AttendanceEntry, ReconInput};
use rollcall_recon::sheet::{load_sheet_csv, SheetOutput};
use rollcall_recon::ReconConfig;

use crate::error::FileError;

/// Read a file as UTF-8, falling back to Windows-1252 for spreadsheet
/// exports that are not valid UTF-8.
pub fn read_text(path: &Path) -> Result<String, FileError> {
    let mut file = File::open(path).map_err(|e| FileError::read(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| FileError::read(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(s)),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            log::debug!("{} is not UTF-8, decoded as Windows-1252", path.display());
            Ok(decoded.into_owned())
        }
    }
}

pub fn load_records_file(path: &Path) -> Result<Vec<AttendanceEntry>, FileError> {
    let text = read_text(path)?;
    load_attendance_json(&text).map_err(|e| FileError::decode(path, e))
}

pub fn load_sheet_file(source: &SheetSource, base_dir: &Path) -> Result<SheetOutput, FileError> {
    let path = base_dir.join(&source.file);
    let text = read_text(&path)?;
    let date = source.session_date()?;
    Ok(load_sheet_csv(&source.title, &text, date)?)
}

/// Every attendance source in `config`, in config order: record files
/// first, then sheets.
pub fn load_input(config: &ReconConfig, base_dir: &Path) -> Result<ReconInput, FileError> {
    let mut input = ReconInput::default();

    for file in &config.attendance.records {
        let path = base_dir.join(file);
        let entries = load_records_file(&path)?;
        log::info!("{}: {} attendance record(s)", path.display(), entries.len());
        input.attendance.extend(entries);
    }

    for source in &config.attendance.sheets {
        let sheet = load_sheet_file(source, base_dir)?;
        log::info!(
            "sheet '{}': {} participant(s), {} skipped row(s)",
            source.title,
            sheet.entries.len(),
            sheet.diagnostics.len()
        );
        input.attendance.extend(sheet.entries);
        input.diagnostics.extend(sheet.diagnostics);
    }

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn records_file_decodes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("att.json");
        fs::write(&path, r#"[{"Course ID":"C1","Last name":"Smith","Date":"2024-05-01"}]"#).unwrap();
        let entries = load_records_file(&path).unwrap();
        assert_eq!(entries[0].course_id.as_deref(), Some("C1"));
    }

    #[test]
    fn bad_records_file_names_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("att.json");
        fs::write(&path, "[{}]").unwrap();
        let err = load_records_file(&path).unwrap_err();
        assert!(matches!(err, FileError::Decode { .. }));
        assert!(err.to_string().contains("att.json"));
    }

    #[test]
    fn missing_records_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = load_records_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
    }

    #[test]
    fn windows_1252_sheet_decodes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        // "Zoë" with 0xEB for ë.
        let mut bytes = b"First name,Last name,Email,Duration,Time joined,Time exited\n".to_vec();
        bytes.extend_from_slice(b"Zo\xEB,Hart,z@example.com,30 min,09:00,09:30\n");
        fs::write(&path, bytes).unwrap();

        let source = SheetSource {
            file: "sheet.csv".into(),
            title: "Meeting records abc-defg-hij".into(),
            date: "2024-05-04".into(),
        };
        let sheet = load_sheet_file(&source, dir.path()).unwrap();
        assert_eq!(sheet.entries.len(), 1);
        assert_eq!(sheet.entries[0].first_name.as_deref(), Some("Zoë"));
    }

    #[test]
    fn bom_is_stripped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("att.json");
        fs::write(&path, "\u{feff}[]").unwrap();
        assert!(load_records_file(&path).unwrap().is_empty());
    }
}
