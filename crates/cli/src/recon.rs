//! `rollcall recon` - config-driven roster reconciliation.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use rollcall_io::crm::upload_all;
use rollcall_io::{load_input, FileRosterStore, JsonLinesSink};
use rollcall_recon::{ReconConfig, ReconResult, RosterStore};

use crate::exit_codes::{EXIT_RECON_DIAGNOSTICS, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_RUNTIME};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Run reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  rollcall recon run evening.toml
  rollcall recon run evening.toml --json
  rollcall recon run evening.toml --output result.json --fail-on-diagnostics")]
    Run {
        /// Path to the run config
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file (overrides output.json in the config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when the run reports any diagnostics
        #[arg(long)]
        fail_on_diagnostics: bool,
    },

    /// Validate a run config without running
    Validate {
        /// Path to the run config
        config: PathBuf,
    },
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run { config, json, output, fail_on_diagnostics } => {
            cmd_recon_run(config, json, output, fail_on_diagnostics)
        }
        ReconCommands::Validate { config } => cmd_recon_validate(config),
    }
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError::new(code, msg)
}

fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot read config: {e}")))?;
    ReconConfig::from_toml(&config_str).map_err(|e| recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string()))
}

fn cmd_recon_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    fail_on_diagnostics: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let store = FileRosterStore::open(base_dir.join(&config.roster.data_dir));
    let input = load_input(&config, base_dir).map_err(|e| recon_err(EXIT_RECON_RUNTIME, e.to_string()))?;

    let result = rollcall_recon::run(&config, &store.snapshot(), &input);

    write_outputs(&config, base_dir, &result, json_output, output_file)?;
    print_summary(&result);

    if fail_on_diagnostics && !result.diagnostics.is_empty() {
        return Err(recon_err(
            EXIT_RECON_DIAGNOSTICS,
            format!("{} diagnostic(s) reported", result.diagnostics.len()),
        )
        .with_hint("run with -v to see each diagnostic as it happens"));
    }

    Ok(())
}

fn write_outputs(
    config: &ReconConfig,
    base_dir: &Path,
    result: &ReconResult,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(result)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("JSON serialization error: {e}")))?;

    let json_path = output_file.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    if let Some(ref path) = json_path {
        std::fs::write(path, &json_str)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref crm) = config.output.crm {
        let path = base_dir.join(crm);
        let mut sink =
            JsonLinesSink::create(&path).map_err(|e| recon_err(EXIT_RECON_RUNTIME, e.to_string()))?;
        let count =
            upload_all(result, &mut sink).map_err(|e| recon_err(EXIT_RECON_RUNTIME, e.to_string()))?;
        eprintln!("wrote {count} CRM record(s) to {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }
    Ok(())
}

/// Human summary to stderr.
fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "recon '{}': {} attendee(s) in {} session(s), {} absentee(s)",
        result.meta.config_name, s.attendance_entries, s.sessions, s.absentees,
    );
    eprintln!(
        "courses: {} provided, {} via meet link, {} via course code, {} uncategorized",
        s.provided, s.via_meet_link, s.via_course_code, s.uncategorized,
    );
    if s.skipped_courses > 0 {
        eprintln!("skipped {} course(s) with no roster", s.skipped_courses);
    }
    for diag in &result.diagnostics {
        eprintln!("  warning: {diag}");
    }
}

fn cmd_recon_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "valid: recon '{}' with {} record file(s), {} sheet(s)",
        config.name,
        config.attendance.records.len(),
        config.attendance.sheets.len(),
    );
    Ok(())
}
