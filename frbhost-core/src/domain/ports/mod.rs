// frbhost-core/src/domain/ports/mod.rs

pub mod dispersion;
pub mod filters;
pub mod fitter;

pub use dispersion::DispersionModel;
pub use filters::FilterCatalog;
pub use fitter::SedFitter;
