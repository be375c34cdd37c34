// frbhost-core/src/application/configure.rs
//
// USE CASE: build and write pcigale.ini (+ pcigale.ini.spec).

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::thread::available_parallelism;
use tracing::{info, instrument, warn};

use crate::application::ports::TemplateEngine;
use crate::application::translate::{ID_COLUMN, REDSHIFT_COLUMN};
use crate::domain::photometry::PhotometryTable;
use crate::domain::sed::config::unused_overrides;
use crate::domain::sed::{CigaleConfig, ConfigRequest, ParamValue};
use crate::error::HostError;
use crate::infrastructure::fs::atomic_write;
use crate::infrastructure::template::{PCIGALE_INI, PCIGALE_INI_SPEC};

pub const SPEC_SUFFIX: &str = ".spec";

/// Logical cores of the host, 1 when unknown.
pub fn host_cores() -> usize {
    available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Assemble the configuration, defaulting `cores` to every logical core.
pub fn build_config(request: ConfigRequest) -> Result<CigaleConfig, HostError> {
    if let (Some(modules), Some(overrides)) = (&request.sed_modules, &request.module_params) {
        for module in unused_overrides(modules, overrides) {
            warn!(module = %module, "Parameter override for a module that is not used");
        }
    }
    Ok(CigaleConfig::build(request, host_cores())?)
}

/// Flux columns of an existing data file: everything but `id` and `redshift`.
pub fn data_file_bands(table: &PhotometryTable) -> Vec<String> {
    table
        .column_names()
        .into_iter()
        .filter(|name| name != ID_COLUMN && name != REDSHIFT_COLUMN)
        .collect()
}

fn entry(key: &str, value: &ParamValue) -> Value {
    json!({
        "key": key,
        "value": value.to_string(),
        "spec": value.spec_type(),
    })
}

/// Flatten the configuration into the shape the ini templates iterate over.
pub fn template_context(config: &CigaleConfig) -> Value {
    let modules: Vec<Value> = config
        .sed_modules_params
        .iter()
        .map(|(name, params)| {
            let params: Vec<Value> = params.iter().map(|(k, v)| entry(k, v)).collect();
            json!({ "name": name, "params": params })
        })
        .collect();
    let analysis: Vec<Value> = config
        .analysis_params
        .entries()
        .iter()
        .map(|(k, v)| entry(k, v))
        .collect();

    json!({
        "data_file": config.data_file,
        "parameters_file": config.parameters_file,
        "sed_modules": config.sed_modules,
        "analysis_method": config.analysis_method,
        "cores": config.cores,
        "modules": modules,
        "analysis": analysis,
    })
}

/// `data_file` as pcigale sees it: it runs from the config file's directory.
///
/// Absolute paths and configs in the working directory are kept as given;
/// otherwise the path is made relative to the config directory, or absolute
/// when it lies outside of it.
pub fn data_file_for_config(data_file: &Path, config_file: &Path) -> Result<String, HostError> {
    let config_dir = config_file.parent().unwrap_or(Path::new(""));
    if data_file.is_absolute() || config_dir.as_os_str().is_empty() {
        return Ok(data_file.to_string_lossy().into_owned());
    }

    let data_abs = std::path::absolute(data_file)?;
    let dir_abs = std::path::absolute(config_dir)?;
    let path = match data_abs.strip_prefix(&dir_abs) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => data_abs,
    };
    Ok(path.to_string_lossy().into_owned())
}

pub fn spec_path(config_file: &Path) -> PathBuf {
    let mut name = config_file.as_os_str().to_owned();
    name.push(SPEC_SUFFIX);
    PathBuf::from(name)
}

/// Render and write the config and its `.spec` companion, replacing both.
#[instrument(skip(engine, config), fields(config_file = %config_file.display()))]
pub fn write_config(
    engine: &dyn TemplateEngine,
    config: &CigaleConfig,
    config_file: &Path,
) -> Result<(), HostError> {
    let context = template_context(config);
    let ini = engine.render(PCIGALE_INI, &context)?;
    let spec = engine.render(PCIGALE_INI_SPEC, &context)?;

    atomic_write(config_file, ini, true)?;
    atomic_write(spec_path(config_file), spec, true)?;

    info!(
        modules = config.sed_modules.len(),
        cores = config.cores,
        "CIGALE configuration written"
    );
    Ok(())
}
