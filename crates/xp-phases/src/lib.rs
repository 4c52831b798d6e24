//! xp-phases: crystalline phases overlaid on a diffraction pattern.
//!
//! Provides:
//! - `Reflection` and `UnitCell` (zero-pressure d-spacings from the cell metric)
//! - `PhaseEntry`: one phase whose volume and d-spacings track its pressure, temperature and
//!   EOS parameters
//! - `PhaseStore`: ordered phases with colour/visibility metadata, observers and the
//!   mutation API
//! - `ReflectionProjector`: positions in d, E or Q and intensities rescaled to the view
//! - `PhaseLoader`: seam for the external file loader and structure converter

pub mod cell;
pub mod color;
pub mod entry;
pub mod error;
pub mod events;
pub mod projector;
pub mod reflection;
pub mod source;
pub mod store;

pub use cell::{Symmetry, UnitCell};
pub use color::{ColorAllocator, Rgb};
pub use entry::PhaseEntry;
pub use error::{LoadFault, PhaseError, PhaseResult};
pub use events::{ObserverList, PhaseEvent, PhaseObserver};
pub use projector::{PositionUnit, ProjectedReflections, ReflectionProjector, RescaledIntensities};
pub use reflection::{LineRow, Reflection};
pub use source::{PhaseDefinition, PhaseLoader, PhaseOrigin, StructureThresholds};
pub use store::{PhaseStore, StoreConfig};
