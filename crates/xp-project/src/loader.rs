//! File-backed phase loader over phase-definition documents.

use crate::schema::PhaseDoc;
use crate::{ProjectError, ProjectResult};
use std::path::Path;
use xp_phases::{LoadFault, PhaseDefinition, PhaseLoader, StructureThresholds};

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Read a phase document; `.json` files are JSON, anything else YAML.
pub fn load_phase_doc(path: &Path) -> ProjectResult<PhaseDoc> {
    let content = std::fs::read_to_string(path)?;
    let doc: PhaseDoc = if is_json(path) {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(doc)
}

pub fn save_phase_doc(path: &Path, doc: &PhaseDoc) -> ProjectResult<()> {
    crate::validate::validate_phase_doc(doc)?;
    let content = if is_json(path) {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_yaml::to_string(doc)?
    };
    std::fs::write(path, content)?;
    Ok(())
}

/// [`PhaseLoader`] reading phase documents from disk.
///
/// Structure files are phase documents carrying computed intensities; conversion normalises
/// them and applies the thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    fn read(&self, path: &Path) -> Result<PhaseDoc, LoadFault> {
        load_phase_doc(path).map_err(|err| match err {
            ProjectError::Io(err) => LoadFault::Io {
                message: err.to_string(),
            },
            other => LoadFault::Malformed {
                message: other.to_string(),
            },
        })
    }
}

impl PhaseLoader for DocumentLoader {
    fn load_definition(&self, path: &Path) -> Result<PhaseDefinition, LoadFault> {
        self.read(path)?.to_definition()
    }

    fn convert_structure(
        &self,
        path: &Path,
        thresholds: StructureThresholds,
    ) -> Result<PhaseDefinition, LoadFault> {
        self.read(path)?.to_structure_definition(thresholds)
    }
}
