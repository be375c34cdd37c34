// frbhost-core/src/domain/ports/dispersion.rs

use crate::domain::frb::Galactic;
use crate::error::HostError;

/// Distance out to which the Milky Way ISM is integrated (kpc).
pub const ISM_DISTANCE_KPC: f64 = 100.0;

/// Galactic electron-density model (e.g. NE2001).
pub trait DispersionModel {
    /// Dispersion measure (pc / cm3) accumulated along `direction` out to `distance_kpc`.
    fn dm_ism(&self, direction: Galactic, distance_kpc: f64) -> Result<f64, HostError>;
}
