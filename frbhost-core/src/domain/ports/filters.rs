// frbhost-core/src/domain/ports/filters.rs

use crate::error::HostError;

/// Photometric filter database.
pub trait FilterCatalog {
    /// Pivot wavelength of filter `name`, in nm.
    fn pivot_wavelength(&self, name: &str) -> Result<f64, HostError>;
}
