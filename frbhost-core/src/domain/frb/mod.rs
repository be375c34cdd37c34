// frbhost-core/src/domain/frb/mod.rs

pub mod coords;
pub mod name;
pub mod record;

pub use coords::{Galactic, SkyCoord};
pub use name::{FRB_PREFIX, parse_frb_name};
pub use record::{FrbRecord, FrbRow, Quantity};
