// frbhost-core/src/domain/ports/fitter.rs

use std::path::Path;

use crate::error::HostError;

/// The external SED fitting engine.
///
/// Both calls run next to `config_file`; results land in `out/` beside it.
pub trait SedFitter {
    fn fit(&self, config_file: &Path) -> Result<(), HostError>;

    fn plot(&self, config_file: &Path) -> Result<(), HostError>;
}
