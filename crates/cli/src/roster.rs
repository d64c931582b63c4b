//! `rollcall roster` - inspect and merge into the on-disk roster store.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serde::Serialize;

use rollcall_io::feed::read_text;
use rollcall_io::FileRosterStore;
use rollcall_recon::model::CourseMeta;
use rollcall_recon::{RosterBatch, RosterStore};

use crate::exit_codes::EXIT_RECON_RUNTIME;
use crate::CliError;

#[derive(Args)]
pub struct DataDirArg {
    /// Roster store directory [default: <user data dir>/rollcall]
    #[arg(long, env = "ROLLCALL_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

impl DataDirArg {
    fn resolve(&self) -> Result<PathBuf, CliError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("rollcall"))
            .ok_or_else(|| {
                CliError::args("no user data directory on this platform")
                    .with_hint("pass --data-dir or set ROLLCALL_DATA_DIR")
            })
    }
}

#[derive(Subcommand)]
pub enum RosterCommands {
    /// Merge a course or student batch into the store
    #[command(after_help = "\
Examples:
  rollcall roster merge --courses courses-page.json
  rollcall roster merge --students names.json --course-id 612345")]
    Merge {
        #[command(flatten)]
        data_dir: DataDirArg,

        /// JSON list of course records
        #[arg(long, conflicts_with_all = ["students", "course_id"], required_unless_present = "students")]
        courses: Option<PathBuf>,

        /// JSON list of enrolled full names
        #[arg(long, requires = "course_id")]
        students: Option<PathBuf>,

        /// Course the student names belong to
        #[arg(long)]
        course_id: Option<String>,
    },

    /// Print the stored roster (all courses, or one course as JSON)
    Show {
        #[command(flatten)]
        data_dir: DataDirArg,

        course_id: Option<String>,
    },
}

pub fn cmd_roster(cmd: RosterCommands) -> Result<(), CliError> {
    match cmd {
        RosterCommands::Merge { data_dir, courses, students, course_id } => {
            let batch = match (courses, students, course_id) {
                (Some(path), _, _) => RosterBatch::CourseBatch(read_json(&path)?),
                (None, Some(path), Some(course_id)) => RosterBatch::StudentBatch {
                    course_id,
                    names: read_json(&path)?,
                },
                _ => return Err(CliError::args("pass --courses, or --students with --course-id")),
            };
            cmd_roster_merge(&data_dir.resolve()?, batch)
        }
        RosterCommands::Show { data_dir, course_id } => {
            cmd_roster_show(&data_dir.resolve()?, course_id.as_deref())
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = read_text(path).map_err(|e| CliError::new(EXIT_RECON_RUNTIME, e.to_string()))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::new(EXIT_RECON_RUNTIME, format!("{}: {e}", path.display())))
}

fn cmd_roster_merge(dir: &Path, batch: RosterBatch) -> Result<(), CliError> {
    let what = match &batch {
        RosterBatch::CourseBatch(courses) => format!("{} course(s)", courses.len()),
        RosterBatch::StudentBatch { course_id, names } => {
            format!("{} name(s) for course {course_id}", names.len())
        }
    };
    let mut store = FileRosterStore::open(dir);
    store
        .merge_file(batch)
        .map_err(|e| CliError::new(EXIT_RECON_RUNTIME, e.to_string()))?;
    eprintln!("merged {what} into {}", store.dir().display());
    Ok(())
}

#[derive(Serialize)]
struct CourseView {
    course_id: String,
    course: Option<CourseMeta>,
    students: Vec<String>,
}

fn cmd_roster_show(dir: &Path, course_id: Option<&str>) -> Result<(), CliError> {
    let store = FileRosterStore::open(dir);

    if let Some(id) = course_id {
        let view = CourseView {
            course_id: id.to_string(),
            course: store.course(id),
            students: store.get(id).unwrap_or_default(),
        };
        if view.course.is_none() && view.students.is_empty() {
            return Err(CliError::general(format!("course {id} is not in {}", store.dir().display()))
                .with_hint("merge its course record or student list first"));
        }
        let json = serde_json::to_string_pretty(&view)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let snapshot = store.snapshot();
    let mut ids: Vec<&String> = snapshot.students.keys().chain(snapshot.courses.keys()).collect();
    ids.sort();
    ids.dedup();

    for id in ids {
        let students = snapshot.students.get(id).map_or(0, Vec::len);
        let description = snapshot
            .courses
            .get(id)
            .and_then(|c| c.description.as_deref().or(Some(c.name.as_str())))
            .unwrap_or("-");
        println!("{id}\t{students}\t{description}");
    }
    Ok(())
}
