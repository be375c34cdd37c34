// frbhost/src/commands/fit.rs
//
// USE CASE: full CIGALE run for one host catalog.

use anyhow::Context;
use comfy_table::Table;
use std::path::{Path, PathBuf};

use frbhost_core::application::run::StepStatus;
use frbhost_core::application::{RunContext, RunOptions, RunSummary, run_pipeline};
use frbhost_core::domain::photometry::{ColumnData, PhotometryTable};
use frbhost_core::infrastructure::adapters::FileTableReader;
use frbhost_core::infrastructure::codec::read_ascii_table;
use frbhost_core::infrastructure::config::{load_module_params, load_project_config};
use frbhost_core::infrastructure::template::JinjaRenderer;
use frbhost_core::ports::TableReader;

use crate::cli::SedArgs;

pub struct FitArgs {
    pub input: PathBuf,
    pub zcol: String,
    pub data_file: PathBuf,
    pub sed: SedArgs,
    pub wait: bool,
    pub no_plot: bool,
    pub outdir: Option<PathBuf>,
    pub compare: bool,
    pub project_dir: PathBuf,
}

fn status_label(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Done => "✅ done",
        StepStatus::Skipped => "⏭️  skipped",
        StepStatus::Warning => "⚠️  warning",
    }
}

fn steps_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Step", "Status", "Detail"]);
    for step in &summary.steps {
        table.add_row(vec![
            step.step.to_string(),
            status_label(step.status).to_string(),
            step.detail.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn cell(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Float(v) => v[row].map_or("nan".to_string(), |x| format!("{x:.6e}")),
        ColumnData::Int(v) => v[row].map_or("--".to_string(), |x| x.to_string()),
        ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
    }
}

fn comparison_table(comparison: &PhotometryTable) -> Table {
    let mut table = Table::new();
    table.set_header(comparison.column_names());
    for row in 0..comparison.row_count() {
        table.add_row(
            comparison
                .columns()
                .iter()
                .map(|c| cell(&c.data, row))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn show_comparison(path: &Path) -> anyhow::Result<()> {
    let comparison = read_ascii_table(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    println!("\n📈 Observed vs model ({})", path.display());
    println!("{}", comparison_table(&comparison));
    Ok(())
}

pub fn execute(args: FitArgs) -> anyhow::Result<()> {
    println!("⚙️  Loading configuration...");
    let config = load_project_config(&args.project_dir)?;
    println!("   Project: {} (CIGALE: {})", config.name, config.pcigale);

    let reader = FileTableReader::new()?;
    let table = reader
        .read_table(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let module_params = args
        .sed
        .params
        .as_deref()
        .map(load_module_params)
        .transpose()
        .context("Failed to load SED parameter overrides")?;

    let options = RunOptions {
        data_file: args.data_file,
        config_file: args.sed.config_file,
        cores: args.sed.cores,
        sed_modules: args.sed.sed_modules,
        module_params,
        wait_for_input: args.wait,
        plot: !args.no_plot,
        outdir: args.outdir,
        compare_obs_model: args.compare,
        ..RunOptions::new(args.zcol)
    };

    let fitter = config.fitter();
    let engine = JinjaRenderer::new();
    let filters = config.filter_catalog(&args.project_dir);
    let ctx = RunContext {
        fitter: &fitter,
        engine: &engine,
        tables: &reader,
        filters: &filters,
    };

    println!("🚀 Running CIGALE on {} objects...", table.row_count());
    let stdin = std::io::stdin();
    let summary = match run_pipeline(&table, &options, &ctx, &mut stdin.lock()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("\n💥 CIGALE RUN FAILED: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", steps_table(&summary));
    if let Some(path) = &summary.comparison {
        show_comparison(path)?;
    }

    println!(
        "\n✨ SUCCESS! Output in {} ({:.2}s)",
        summary.output_dir.display(),
        summary.duration_secs
    );
    Ok(())
}
