//! `rollcall name` - the name helpers the engine uses, exposed for checking
//! individual roster entries.

use clap::Subcommand;

use rollcall_recon::{extract_course_code, split_name};

use crate::CliError;

#[derive(Subcommand)]
pub enum NameCommands {
    /// Split a full name into first and last name (tab separated)
    #[command(after_help = "\
Examples:
  rollcall name split 'Jean van Berg'      # Jean van<TAB>Berg")]
    Split {
        full_name: String,
    },

    /// Recover a course code packed into a last-name field
    #[command(after_help = "\
Examples:
  rollcall name course-code 'khan-CS-101-F24-B-2024'   # 2024-B-F24-CS")]
    CourseCode {
        last_name: String,
    },
}

pub fn cmd_name(cmd: NameCommands) -> Result<(), CliError> {
    match cmd {
        NameCommands::Split { full_name } => {
            let (first, last) = split_name(&full_name);
            println!("{first}\t{last}");
            Ok(())
        }
        NameCommands::CourseCode { last_name } => match extract_course_code(&last_name) {
            Some(code) => {
                println!("{code}");
                Ok(())
            }
            None => Err(CliError::general(format!("no course code in '{last_name}'"))
                .with_hint("expected at least four '-' separated code parts after the name")),
        },
    }
}
