// frbhost-core/src/application/mod.rs

pub mod compare;
pub mod configure;
pub mod ports;
pub mod records;
pub mod run;
pub mod translate;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI only needs `frbhost_core::application::{...}`.

pub use compare::compare_obs_model;
pub use configure::{build_config, data_file_bands, data_file_for_config, write_config};
pub use records::{BuildReport, RecordOptions, Selection, build_records, rows_from_table};
pub use run::{RunContext, RunOptions, RunSummary, run_pipeline};
pub use translate::{TranslationReport, translate_catalog};
