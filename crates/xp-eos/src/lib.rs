//! xp-eos: equations of state for crystalline phases.
//!
//! Provides:
//! - A static catalog of EOS formulations (`jcpds4`, `bm3`, `slb2`) and their parameters
//! - Parameter sets bound to one formulation, default-filled from the catalog
//! - A solver for zero-pressure volume, volume at `(P, T)` and d-spacing scaling
//! - The Debye thermal model used by the quasi-harmonic formulation
//!
//! # Units
//!
//! Pressures and temperatures cross the API as `uom` quantities. Each formulation keeps its
//! parameters in the units it was tabulated in (`GPa` and Å³ for `jcpds4`/`bm3`, SI for
//! `slb2`); the solver converts the pressure axis, volumes are only ever compared within one
//! formulation.
//!
//! # Example
//!
//! ```
//! use xp_eos::{EosKind, EosParameterSet, EosSolver, keys};
//! use xp_core::units::{gpa, k};
//!
//! let params = EosParameterSet::new(
//!     EosKind::Bm3,
//!     [(keys::V_0, 74.7), (keys::K_0, 160.0), (keys::KPRIME_0, 4.0)],
//! )
//! .unwrap();
//! let state = EosSolver::default().evaluate(&params, gpa(10.0), k(300.0)).unwrap();
//! assert!(state.scale_factor() < 1.0);
//! ```

pub mod birch_murnaghan;
pub mod catalog;
pub mod debye;
pub mod error;
pub mod params;
pub mod root;
pub mod slb;
pub mod solver;

pub use catalog::{
    EosKind, EosVariant, ParameterDescriptor, PressureUnit, describe, equations_of_state, keys,
};
pub use error::{EosError, EosResult};
pub use params::EosParameterSet;
pub use root::SolverConfig;
pub use solver::{EosSolver, EosState, d_spacing_scale_factor};
