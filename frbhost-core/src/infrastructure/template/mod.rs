// frbhost-core/src/infrastructure/template/mod.rs

pub mod jinja;

pub use jinja::JinjaRenderer;

pub const PCIGALE_INI: &str = include_str!("templates/pcigale.ini.j2");
pub const PCIGALE_INI_SPEC: &str = include_str!("templates/pcigale.ini.spec.j2");
