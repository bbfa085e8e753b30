//! Transpile command implementation.
//!
//! Validates a project, then calls `getTranspiledFileContents` for every
//! loaded file and writes `{code}` (and its source map) under `--out`. A
//! project with Errors still gets best-effort output per section 7's
//! "callers decide whether to discard" policy — `bast transpile` itself
//! just reports exit code 1 while still writing what it produced.

use std::fs;
use std::path::{Path, PathBuf};

use basc_drv::{FileProvider, FsFileProvider, Program};

use crate::commands::common::{format_diagnostic_human, has_errors, output_messages, DiagnosticJson, ReportFormat};
use crate::commands::validate::load_config;
use crate::error::{BastError, Result};

/// Arguments for the transpile command.
#[derive(Debug, Clone)]
pub struct TranspileArgs {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub format: ReportFormat,
    pub verbose: bool,
    pub emit_maps: bool,
}

/// Runs `bast transpile`, returning the section 6 exit code.
pub fn run_transpile(args: TranspileArgs) -> Result<i32> {
    let config = load_config(&args.root, args.config.as_deref())?;
    let root = args.root.join(&config.root_dir);

    let mut program = Program::build_from_root(&root, FsFileProvider::new(&root))
        .map_err(|e| BastError::CommandExecution(format!("failed to load project at {}: {e}", root.display())))?;

    let diagnostics = program.validate();
    let errored = has_errors(&diagnostics);

    let out_dir = args
        .out
        .or_else(|| config.out_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| args.root.join("out"));
    fs::create_dir_all(&out_dir)?;

    let files = collect_logical_paths(&root, program.provider());
    let mut written = 0usize;
    for logical_path in files {
        let Some(transpiled) = program.get_transpiled_file_contents(&logical_path) else { continue };
        let dest = out_dir.join(to_output_name(&logical_path));
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &transpiled.code)?;
        if args.emit_maps {
            let map_path = PathBuf::from(format!("{}.map.json", dest.display()));
            let segments: Vec<serde_json::Value> = transpiled
                .map
                .mappings()
                .iter()
                .map(|seg| {
                    serde_json::json!({
                        "generated": { "start": seg.generated.start, "end": seg.generated.end },
                        "original": { "start": seg.original.start, "end": seg.original.end },
                    })
                })
                .collect();
            if let Ok(map_json) = serde_json::to_string_pretty(&segments) {
                let _ = fs::write(map_path, map_json);
            }
        }
        written += 1;
    }

    report_diagnostics(&diagnostics, args.format);
    if args.verbose {
        println!("{}", output_messages::WROTE_FILE.replace("{}", &format!("{written} file(s) to {}", out_dir.display())));
    }

    Ok(if errored { 1 } else { 0 })
}

/// Recomputes the `.bs`/`.brs` → `.brs` rename for an output path, leaving
/// anything else (e.g. a plain `.brs` source) unchanged.
fn to_output_name(logical_path: &str) -> String {
    if let Some(stripped) = logical_path.strip_suffix(".bs") {
        format!("{stripped}.brs")
    } else {
        logical_path.to_string()
    }
}

fn collect_logical_paths(root: &Path, provider: &FsFileProvider) -> Vec<String> {
    provider
        .list_files(root, &["*.bs", "*.brs"], &[])
        .into_iter()
        .map(|(_, logical)| logical)
        .collect()
}

fn report_diagnostics(diagnostics: &[basc_util::diagnostic::Diagnostic], format: ReportFormat) {
    match format {
        ReportFormat::Human => {
            for d in diagnostics {
                eprintln!("{}", format_diagnostic_human(d));
            }
        }
        ReportFormat::Json => {
            let payload: Vec<DiagnosticJson> = diagnostics.iter().map(DiagnosticJson::from).collect();
            if let Ok(s) = serde_json::to_string_pretty(&payload) {
                println!("{s}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn transpile_writes_lowered_output_and_returns_zero_for_a_clean_project() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.bs"), "function main()\nx = new Widget()\nend function\n").unwrap();
        fs::write(
            dir.path().join("Main.xml"),
            r#"<component name="Main"><script uri="pkg:/main.bs" type="text/brightscript" /></component>"#,
        )
        .unwrap();

        let out = dir.path().join("out");
        let args = TranspileArgs {
            root: dir.path().to_path_buf(),
            config: None,
            out: Some(out.clone()),
            format: ReportFormat::Human,
            verbose: false,
            emit_maps: false,
        };
        let code = run_transpile(args).unwrap();
        assert_eq!(code, 0);
        let emitted = fs::read_to_string(out.join("main.brs")).unwrap();
        assert!(emitted.contains("Widget()"));
    }

    #[test]
    fn transpile_still_writes_best_effort_output_when_validation_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.bs"), "function main()\ngoAway()\nend function\n").unwrap();
        fs::write(
            dir.path().join("Main.xml"),
            r#"<component name="Main"><script uri="pkg:/main.bs" type="text/brightscript" /></component>"#,
        )
        .unwrap();

        let out = dir.path().join("out");
        let args = TranspileArgs {
            root: dir.path().to_path_buf(),
            config: None,
            out: Some(out.clone()),
            format: ReportFormat::Human,
            verbose: false,
            emit_maps: false,
        };
        let code = run_transpile(args).unwrap();
        assert_eq!(code, 1);
        assert!(out.join("main.brs").exists());
    }
}
