// frbhost-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Table readers used by the use cases.
pub mod ports;

// 2. Domain
// Photometry tables, SED module defaults, FRB records. No IO in here.
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, FITS codec, external commands, config files, templates.
pub mod infrastructure;

// 4. Application (Use Cases)
// Translate, configure, run driver, comparison table, record builder.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::HostError;
