// frbhost/src/commands/translate.rs
//
// USE CASE: survey catalog -> CIGALE data file.

use anyhow::Context;
use std::path::PathBuf;

use frbhost_core::application::translate_catalog;
use frbhost_core::infrastructure::adapters::FileTableReader;
use frbhost_core::ports::TableReader;

pub fn execute(
    input: PathBuf,
    zcol: String,
    data_file: PathBuf,
    no_overwrite: bool,
) -> anyhow::Result<()> {
    println!("🔭 Reading {}...", input.display());

    let reader = FileTableReader::new()?;
    let table = reader
        .read_table(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    println!(
        "   {} rows, {} columns",
        table.row_count(),
        table.column_names().len()
    );

    let report = translate_catalog(&table, &zcol, &data_file, !no_overwrite)
        .with_context(|| format!("Failed to translate {}", input.display()))?;

    println!("📝 Bands: {}", report.bands.join(", "));
    println!(
        "✨ {} objects written to {}",
        report.rows,
        report.path.display()
    );
    Ok(())
}
