// frbhost-core/src/application/run.rs
//
// USE CASE: translate -> configure -> (pause) -> fit -> (plot) -> (relocate) -> (compare)

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::application::compare::compare_obs_model;
use crate::application::configure::{build_config, data_file_for_config, write_config};
use crate::application::ports::TemplateEngine;
use crate::application::translate::translate_catalog;
use crate::domain::photometry::PhotometryTable;
use crate::domain::ports::filters::FilterCatalog;
use crate::domain::ports::fitter::SedFitter;
use crate::domain::sed::{ConfigRequest, DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE, ModuleParams};
use crate::error::HostError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::table::TableReader;

/// Directory pcigale writes its results to, next to the config file.
pub const CIGALE_OUT_DIR: &str = "out";
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub zcol: String,
    pub data_file: PathBuf,
    pub config_file: PathBuf,
    pub cores: Option<usize>,
    pub sed_modules: Option<Vec<String>>,
    pub module_params: Option<BTreeMap<String, ModuleParams>>,
    pub wait_for_input: bool,
    pub plot: bool,
    pub outdir: Option<PathBuf>,
    pub compare_obs_model: bool,
}

impl RunOptions {
    pub fn new(zcol: impl Into<String>) -> Self {
        Self {
            zcol: zcol.into(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            cores: None,
            sed_modules: None,
            module_params: None,
            wait_for_input: false,
            plot: true,
            outdir: None,
            compare_obs_model: false,
        }
    }
}

/// The external collaborators of a run.
pub struct RunContext<'a> {
    pub fitter: &'a dyn SedFitter,
    pub engine: &'a dyn TemplateEngine,
    pub tables: &'a dyn TableReader,
    pub filters: &'a dyn FilterCatalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Done,
    Skipped,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: &'static str,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub data_file: PathBuf,
    pub config_file: PathBuf,
    pub output_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<PathBuf>,
    pub steps: Vec<StepOutcome>,
}

impl RunSummary {
    pub fn status(&self, step: &str) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.step == step).map(|s| s.status)
    }
}

fn outcome(step: &'static str, status: StepStatus, detail: Option<String>) -> StepOutcome {
    StepOutcome {
        step,
        status,
        detail,
    }
}

fn config_dir(config_file: &Path) -> PathBuf {
    match config_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Block until one line is read from `input`.
fn wait_for_edit(config_file: &Path, input: &mut dyn BufRead) -> Result<(), HostError> {
    print!(
        "Edit the generated config file {} and press Enter to run. ",
        config_file.display()
    );
    std::io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// `path` made absolute with symlinks resolved as far as it exists.
fn resolved(path: &Path) -> Result<PathBuf, InfrastructureError> {
    if path.exists() {
        return Ok(fs::canonicalize(path)?);
    }
    let absolute = std::path::absolute(path)?;
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) if parent.exists() => Ok(fs::canonicalize(parent)?.join(name)),
        _ => Ok(absolute),
    }
}

/// Replace `target` with `source`: rename, falling back to a recursive move
/// when the two live on different filesystems.
///
/// A target that is `source` itself is a no-op. A target containing `source`,
/// or inside it, is refused before anything is removed.
pub fn relocate_output(source: &Path, target: &Path) -> Result<(), InfrastructureError> {
    if !source.is_dir() {
        return Err(InfrastructureError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("CIGALE output '{}' not found", source.display()),
        )));
    }
    let source_abs = fs::canonicalize(source)?;
    let target_abs = resolved(target)?;
    if source_abs == target_abs {
        return Ok(());
    }
    if source_abs.starts_with(&target_abs) || target_abs.starts_with(&source_abs) {
        return Err(InfrastructureError::OutputOverlap {
            source_dir: source.display().to_string(),
            target: target.display().to_string(),
        });
    }

    if target.exists() {
        fs::remove_dir_all(target)?;
    }
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }

    let options = fs_extra::dir::CopyOptions::new().copy_inside(true);
    fs_extra::dir::move_dir(source, target, &options)
        .map(|_| ())
        .map_err(|e| InfrastructureError::Io(std::io::Error::other(e.to_string())))
}

/// Full CIGALE run for `table`. `input` feeds the manual-edit pause.
#[instrument(skip_all, fields(zcol = %options.zcol))]
pub fn run_pipeline(
    table: &PhotometryTable,
    options: &RunOptions,
    ctx: &RunContext<'_>,
    input: &mut dyn BufRead,
) -> Result<RunSummary, HostError> {
    let started_at = Utc::now();
    let clock = Instant::now();
    let mut steps = Vec::new();

    // 1. Translate
    let report = translate_catalog(table, &options.zcol, &options.data_file, true)?;
    steps.push(outcome(
        "translate",
        StepStatus::Done,
        Some(format!("{} rows, {} bands", report.rows, report.bands.len())),
    ));

    // 2. Configure
    let config = build_config(ConfigRequest {
        data_file: data_file_for_config(&options.data_file, &options.config_file)?,
        cores: options.cores,
        sed_modules: options.sed_modules.clone(),
        module_params: options.module_params.clone(),
        bands: report.bands.clone(),
    })?;
    write_config(ctx.engine, &config, &options.config_file)?;
    steps.push(outcome("configure", StepStatus::Done, None));

    // 3. Manual edit
    if options.wait_for_input {
        wait_for_edit(&options.config_file, input)?;
        steps.push(outcome("pause", StepStatus::Done, None));
    } else {
        steps.push(outcome("pause", StepStatus::Skipped, None));
    }

    // 4. Fit
    info!("Running CIGALE");
    ctx.fitter.fit(&options.config_file)?;
    steps.push(outcome("fit", StepStatus::Done, None));

    // 5. Plot
    if options.plot {
        ctx.fitter.plot(&options.config_file)?;
        steps.push(outcome("plot", StepStatus::Done, None));
    } else {
        steps.push(outcome("plot", StepStatus::Skipped, None));
    }

    // 6. Relocate (best effort)
    let default_out = config_dir(&options.config_file).join(CIGALE_OUT_DIR);
    let output_dir = match &options.outdir {
        Some(target) => match relocate_output(&default_out, target) {
            Ok(()) => {
                steps.push(outcome("relocate", StepStatus::Done, None));
                target.clone()
            }
            Err(e) => {
                warn!(
                    outdir = %target.display(),
                    error = %e,
                    "Invalid output directory path. Output stored in {}",
                    default_out.display()
                );
                steps.push(outcome("relocate", StepStatus::Warning, Some(e.to_string())));
                default_out.clone()
            }
        },
        None => {
            steps.push(outcome("relocate", StepStatus::Skipped, None));
            default_out.clone()
        }
    };

    // 7. Compare
    let comparison = if options.compare_obs_model {
        let path = compare_obs_model(
            &config.analysis_params.bands,
            &options.data_file,
            &output_dir,
            ctx.tables,
            ctx.filters,
        )?;
        steps.push(outcome("compare", StepStatus::Done, None));
        Some(path)
    } else {
        steps.push(outcome("compare", StepStatus::Skipped, None));
        None
    };

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        duration_secs: clock.elapsed().as_secs_f64(),
        data_file: options.data_file.clone(),
        config_file: options.config_file.clone(),
        output_dir,
        comparison,
        steps,
    };

    let summary_path = config_dir(&options.config_file).join(RUN_SUMMARY_FILE);
    let json = serde_json::to_string_pretty(&summary).map_err(InfrastructureError::from)?;
    atomic_write(&summary_path, json, true)?;
    info!(duration = ?clock.elapsed(), "CIGALE run finished");

    Ok(summary)
}
