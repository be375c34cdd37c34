// frbhost/src/commands/build_frbs.rs
//
// USE CASE: FRB base table -> data/FRBs/<FRB>.json

use anyhow::{Context, bail};
use comfy_table::Table;
use std::path::PathBuf;

use frbhost_core::application::{BuildReport, RecordOptions, Selection, build_records, rows_from_table};
use frbhost_core::infrastructure::adapters::FileTableReader;
use frbhost_core::infrastructure::config::load_project_config;
use frbhost_core::infrastructure::config::project::resolve;
use frbhost_core::ports::TableReader;

pub struct BuildArgs {
    pub frbs: String,
    pub base_table: Option<PathBuf>,
    pub out_path: Option<PathBuf>,
    pub override_failures: bool,
    pub project_dir: PathBuf,
}

fn records_table(report: &BuildReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["FRB", "DM", "DM_ISM", "z", "repeater"]);
    for record in &report.records {
        table.add_row(vec![
            record.name.clone(),
            format!("{:.2}", record.dm.value),
            record
                .dm_ism
                .as_ref()
                .map_or("-".to_string(), |q| format!("{:.2}", q.value)),
            record.z.map_or("-".to_string(), |z| z.to_string()),
            record.repeater.to_string(),
        ]);
    }
    table
}

pub fn execute(args: BuildArgs) -> anyhow::Result<()> {
    let config = load_project_config(&args.project_dir)?;

    let base_table = match args.base_table.or_else(|| config.base_table.clone()) {
        Some(path) => resolve(&args.project_dir, &path),
        None => bail!("No base table given (use --base-table or `base-table` in frbhost.yaml)"),
    };
    let out_path = args
        .out_path
        .unwrap_or_else(|| resolve(&args.project_dir, &config.records_dir));

    println!("📡 Building FRB records from {}...", base_table.display());
    let table = FileTableReader::new()?
        .read_table(&base_table)
        .with_context(|| format!("Failed to read {}", base_table.display()))?;
    let rows = rows_from_table(&table)?;
    println!("   {} FRBs in the base table", rows.len());

    let options = RecordOptions {
        out_path,
        override_failures: args.override_failures,
    };
    let report = match build_records(
        &Selection::parse(&args.frbs),
        &rows,
        &config.dispersion_model(),
        &options,
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\n❌ Record build failed: {}", e);
            std::process::exit(1);
        }
    };

    if !report.records.is_empty() {
        println!("{}", records_table(&report));
    }
    for path in &report.written {
        println!("   📝 {}", path.display());
    }
    for name in &report.unmatched {
        eprintln!("   ⚠️  {} not in the base table", name);
    }
    for name in &report.skipped {
        eprintln!("   ⚠️  {} skipped (DM_ISM unavailable)", name);
    }

    println!(
        "✨ {} record(s) written to {}",
        report.written.len(),
        options.out_path.display()
    );
    Ok(())
}
