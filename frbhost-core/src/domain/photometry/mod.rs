// frbhost-core/src/domain/photometry/mod.rs

pub mod columns;
pub mod flux;
pub mod table;

pub use columns::{
    BandPair, BandRename, MASK_SENTINEL, canonical_band_name, detect_mag_columns,
    find_identifier,
};
pub use flux::convert_mags_to_flux;
pub use table::{Column, ColumnData, PhotometryTable};
