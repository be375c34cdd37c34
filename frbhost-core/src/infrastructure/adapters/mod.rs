// frbhost-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod filters;
pub mod ne2001;
pub mod pcigale;
pub mod process;
pub mod tables;

pub use duckdb::DuckDbTableReader;
pub use filters::{ChainedCatalog, FilterDirectory, PivotTable};
pub use ne2001::Ne2001Command;
pub use pcigale::PcigaleCommand;
pub use tables::FileTableReader;
