// frbhost/src/commands/mod.rs

pub mod build_frbs;
pub mod configure;
pub mod fit;
pub mod translate;
