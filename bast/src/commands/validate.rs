//! Validate command implementation.
//!
//! Builds a `Program` over a project root and runs the Structural and
//! Scoped validation passes (section 4.4), reporting diagnostics and
//! mapping them to the section 6 exit codes.

use std::path::PathBuf;

use basc_drv::{FsFileProvider, Program};

use crate::commands::common::{has_errors, format_diagnostic_human, DiagnosticJson, ReportFormat};
use crate::config::BascConfig;
use crate::error::{BastError, Result};

/// Arguments for the validate command.
#[derive(Debug, Clone)]
pub struct ValidateArgs {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub format: ReportFormat,
    pub verbose: bool,
}

/// Runs `bast validate`, returning the section 6 exit code: 0 if no errors,
/// 1 if the program has errors. Configuration errors are reported as `Err`
/// and mapped to exit code 2 by the caller.
pub fn run_validate(args: ValidateArgs) -> Result<i32> {
    let config = load_config(&args.root, args.config.as_deref())?;
    let root = args.root.join(&config.root_dir);

    let mut program = Program::build_from_root(&root, FsFileProvider::new(&root))
        .map_err(|e| BastError::CommandExecution(format!("failed to load project at {}: {e}", root.display())))?;

    let diagnostics = program.validate();
    report(&diagnostics, args.format, program.file_count(), args.verbose);

    Ok(if has_errors(&diagnostics) { 1 } else { 0 })
}

pub(crate) fn load_config(root: &PathBuf, explicit: Option<&std::path::Path>) -> Result<BascConfig> {
    match explicit {
        Some(path) => BascConfig::load_from_path(path),
        None => {
            let default_path = root.join(crate::config::CONFIG_FILE_NAME);
            if default_path.exists() {
                BascConfig::load_from_path(&default_path)
            } else {
                Ok(BascConfig::default())
            }
        }
    }
}

fn report(diagnostics: &[basc_util::diagnostic::Diagnostic], format: ReportFormat, file_count: usize, verbose: bool) {
    match format {
        ReportFormat::Human => {
            for d in diagnostics {
                eprintln!("{}", format_diagnostic_human(d));
            }
            if verbose || !diagnostics.is_empty() {
                let errors = diagnostics.iter().filter(|d| d.level.is_error()).count();
                let warnings = diagnostics.iter().filter(|d| d.level.is_warning()).count();
                if errors == 0 {
                    println!("{}", crate::commands::common::output_messages::VALIDATION_PASSED.replace("{}", &file_count.to_string()));
                } else {
                    eprintln!(
                        "{} error(s), {} warning(s) across {} file(s)",
                        errors, warnings, file_count
                    );
                }
            }
        }
        ReportFormat::Json => {
            let payload: Vec<DiagnosticJson> = diagnostics.iter().map(DiagnosticJson::from).collect();
            match serde_json::to_string_pretty(&payload) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("failed to serialize diagnostics: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_project(dir: &std::path::Path) {
        fs::write(dir.join("main.bs"), "function main()\ngoAway()\nend function\n").unwrap();
        fs::write(
            dir.join("Main.xml"),
            r#"<component name="Main"><script uri="pkg:/main.bs" type="text/brightscript" /></component>"#,
        )
        .unwrap();
    }

    #[test]
    fn validate_returns_exit_code_one_when_errors_are_present() {
        let dir = TempDir::new().unwrap();
        write_project(dir.path());
        let args = ValidateArgs { root: dir.path().to_path_buf(), config: None, format: ReportFormat::Json, verbose: false };
        assert_eq!(run_validate(args).unwrap(), 1);
    }

    #[test]
    fn validate_returns_exit_code_zero_for_a_clean_project() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.bs"), "function main()\nend function\n").unwrap();
        fs::write(
            dir.path().join("Main.xml"),
            r#"<component name="Main"><script uri="pkg:/main.bs" type="text/brightscript" /></component>"#,
        )
        .unwrap();
        let args = ValidateArgs { root: dir.path().to_path_buf(), config: None, format: ReportFormat::Human, verbose: false };
        assert_eq!(run_validate(args).unwrap(), 0);
    }

    #[test]
    fn validate_surfaces_a_malformed_config_as_an_error() {
        let dir = TempDir::new().unwrap();
        write_project(dir.path());
        let config_path = dir.path().join("bast.toml");
        fs::write(&config_path, "deploy = true\n").unwrap();
        let args =
            ValidateArgs { root: dir.path().to_path_buf(), config: Some(config_path), format: ReportFormat::Human, verbose: false };
        let err = run_validate(args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
