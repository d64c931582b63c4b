//! CRM attendance-event records and the sinks that collect them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use rollcall_recon::model::{AbsenteeEntry, AttendanceEntry, ReconResult};

use crate::error::FileError;

/// Object the records are written against.
pub const CRM_OBJECT: &str = "hed__Attendance_Event__c";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One attendance event as the CRM expects it.
///
/// `Course_Offering_ID__c` carries the course description, which is what the
/// CRM keys its course offerings by. `hed__Contact__c` is never known here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrmRecord {
    #[serde(rename = "Course_Offering_ID__c")]
    pub course_offering: Option<String>,
    #[serde(rename = "Duration__c")]
    pub duration: Option<String>,
    #[serde(rename = "Email__c")]
    pub email: Option<String>,
    #[serde(rename = "First_Name__c")]
    pub first_name: Option<String>,
    #[serde(rename = "Last_Name__c")]
    pub last_name: Option<String>,
    #[serde(rename = "Time_Exited__c")]
    pub time_exited: Option<String>,
    #[serde(rename = "Time__c")]
    pub time_joined: Option<String>,
    #[serde(rename = "hed__Contact__c")]
    pub contact: Option<String>,
    #[serde(rename = "hed__Date__c")]
    pub date: NaiveDate,
    #[serde(rename = "Attendance_Status__c")]
    pub status: AttendanceStatus,
}

impl From<&AttendanceEntry> for CrmRecord {
    fn from(e: &AttendanceEntry) -> Self {
        Self {
            course_offering: e.course.clone(),
            duration: e.duration.clone(),
            email: e.email.clone(),
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            time_exited: e.time_exited.clone(),
            time_joined: e.time_joined.clone(),
            contact: None,
            date: e.date,
            status: AttendanceStatus::Present,
        }
    }
}

impl From<&AbsenteeEntry> for CrmRecord {
    fn from(a: &AbsenteeEntry) -> Self {
        Self {
            course_offering: a.course.clone(),
            duration: None,
            email: None,
            first_name: Some(a.first_name.clone()),
            last_name: Some(a.last_name.clone()),
            time_exited: None,
            time_joined: None,
            contact: None,
            date: a.date,
            status: AttendanceStatus::Absent,
        }
    }
}

/// Every record of a run: attendance first (uncategorized included), then
/// absentees.
pub fn crm_records(result: &ReconResult) -> Vec<CrmRecord> {
    result
        .attendance
        .iter()
        .map(CrmRecord::from)
        .chain(result.absentees.iter().map(CrmRecord::from))
        .collect()
}

/// Destination for CRM records.
pub trait RecordSink {
    fn accept(&mut self, record: &CrmRecord) -> Result<(), FileError>;

    fn finish(&mut self) -> Result<(), FileError> {
        Ok(())
    }
}

impl RecordSink for Vec<CrmRecord> {
    fn accept(&mut self, record: &CrmRecord) -> Result<(), FileError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn create(path: &Path) -> Result<Self, FileError> {
        let file = File::create(path).map_err(|e| FileError::write(path, e))?;
        Ok(Self { path: path.to_path_buf(), writer: BufWriter::new(file) })
    }
}

impl RecordSink for JsonLinesSink {
    fn accept(&mut self, record: &CrmRecord) -> Result<(), FileError> {
        serde_json::to_writer(&mut self.writer, record).map_err(|e| FileError::write(&self.path, e))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| FileError::write(&self.path, e))
    }

    fn finish(&mut self) -> Result<(), FileError> {
        self.writer.flush().map_err(|e| FileError::write(&self.path, e))
    }
}

/// Feed every record of `result` to `sink`. Returns the count written.
pub fn upload_all(result: &ReconResult, sink: &mut dyn RecordSink) -> Result<usize, FileError> {
    let records = crm_records(result);
    for record in &records {
        sink.accept(record)?;
    }
    sink.finish()?;
    log::info!("wrote {} {CRM_OBJECT} record(s)", records.len());
    Ok(records.len())
}
