//! `rollcall-recon` — roster reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded roster snapshots and attendance
//! records, returns absentees and augmented attendance. No CLI or file IO.

pub mod absentees;
pub mod config;
pub mod course_code;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod model;
pub mod names;
pub mod resolve;
pub mod sheet;
pub mod store;

pub use absentees::derive_absentees;
pub use config::ReconConfig;
pub use course_code::extract_course_code;
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use model::{AbsenteeEntry, AttendanceEntry, CourseMeta, ReconInput, ReconResult, RosterSnapshot};
pub use names::split_name;
pub use store::{MemoryRosterStore, RosterBatch, RosterStore};
