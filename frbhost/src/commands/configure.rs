// frbhost/src/commands/configure.rs
//
// USE CASE: write pcigale.ini for an existing (or future) data file.

use anyhow::Context;
use std::path::PathBuf;

use frbhost_core::application::{
    build_config, data_file_bands, data_file_for_config, write_config,
};
use frbhost_core::domain::sed::ConfigRequest;
use frbhost_core::infrastructure::adapters::FileTableReader;
use frbhost_core::infrastructure::config::load_module_params;
use frbhost_core::infrastructure::template::JinjaRenderer;
use frbhost_core::ports::TableReader;

use crate::cli::SedArgs;

pub fn execute(data_file: PathBuf, sed: SedArgs) -> anyhow::Result<()> {
    println!("⚙️  Building CIGALE configuration...");

    // Bands come from the data file when it is already there.
    let bands = if data_file.exists() {
        let table = FileTableReader::new()?
            .read_table(&data_file)
            .with_context(|| format!("Failed to read {}", data_file.display()))?;
        data_file_bands(&table)
    } else {
        println!(
            "   ⚠️  {} not found, leaving analysis bands empty",
            data_file.display()
        );
        Vec::new()
    };

    let module_params = sed
        .params
        .as_deref()
        .map(load_module_params)
        .transpose()
        .context("Failed to load SED parameter overrides")?;

    let config = build_config(ConfigRequest {
        data_file: data_file_for_config(&data_file, &sed.config_file)?,
        cores: sed.cores,
        sed_modules: sed.sed_modules,
        module_params,
        bands,
    })?;

    write_config(&JinjaRenderer::new(), &config, &sed.config_file)
        .with_context(|| format!("Failed to write {}", sed.config_file.display()))?;

    println!("   Modules: {}", config.sed_modules.join(", "));
    println!("   Cores: {}", config.cores);
    println!(
        "✨ Configuration written to {}",
        sed.config_file.display()
    );
    Ok(())
}
