//! Interfaces to the external phase-definition loader and structure converter.

use crate::cell::UnitCell;
use crate::error::{LoadFault, PhaseError, PhaseResult};
use crate::reflection::Reflection;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything a loader extracts from one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDefinition {
    pub name: String,
    /// Catalog identifier of the equation of state (`jcpds4`, `bm3`, `slb2`, ...)
    pub eos: String,
    pub parameters: BTreeMap<String, f64>,
    pub cell: Option<UnitCell>,
    pub reflections: Vec<Reflection>,
}

/// Filters applied when converting a crystal structure into reflections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureThresholds {
    /// Lines weaker than this percentage of the strongest line are dropped (0-100)
    pub intensity_cutoff: f64,
    /// Lines with smaller d-spacing [Å] are dropped
    pub minimum_d_spacing: f64,
}

impl Default for StructureThresholds {
    fn default() -> Self {
        Self {
            intensity_cutoff: 0.5,
            minimum_d_spacing: 0.5,
        }
    }
}

/// Where a phase was read from, kept so it can be reloaded.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseOrigin {
    Definition(PathBuf),
    Structure {
        path: PathBuf,
        thresholds: StructureThresholds,
    },
}

impl PhaseOrigin {
    pub fn path(&self) -> &Path {
        match self {
            PhaseOrigin::Definition(path) => path,
            PhaseOrigin::Structure { path, .. } => path,
        }
    }

    /// Read the origin again through `loader`.
    pub fn load(&self, loader: &dyn PhaseLoader) -> PhaseResult<PhaseDefinition> {
        let result = match self {
            PhaseOrigin::Definition(path) => loader.load_definition(path),
            PhaseOrigin::Structure { path, thresholds } => {
                loader.convert_structure(path, *thresholds)
            }
        };
        result.map_err(|fault| PhaseError::load(self.path(), fault))
    }
}

/// External collaborator that turns files into phase definitions.
pub trait PhaseLoader {
    /// Parse a phase-definition file (cell, EOS parameters and reflection list).
    fn load_definition(&self, path: &Path) -> Result<PhaseDefinition, LoadFault>;

    /// Convert a crystal-structure file into a definition with computed intensities.
    ///
    /// Default implementation reports the conversion as unsupported.
    fn convert_structure(
        &self,
        path: &Path,
        _thresholds: StructureThresholds,
    ) -> Result<PhaseDefinition, LoadFault> {
        Err(LoadFault::Unsupported {
            what: format!("structure conversion of {}", path.display()),
        })
    }
}
