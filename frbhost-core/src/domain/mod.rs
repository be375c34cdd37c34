// frbhost-core/src/domain/mod.rs

pub mod error;
pub mod frb;
pub mod photometry;
pub mod ports;
pub mod sed;

// Handy re-exports to simplify imports elsewhere
pub use error::DomainError;
