// frbhost-core/src/infrastructure/config/mod.rs

pub mod params;
pub mod project;

pub use params::{ModuleOverrides, load_module_params};
pub use project::{ProjectConfig, load_project_config};
