//! xp-core: stable foundation for the phase-overlay workspace.
//!
//! Contains:
//! - units (uom SI types + constructors, GPa/Pa/K helpers)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact handles for observers and other registry objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{XpError, XpResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
