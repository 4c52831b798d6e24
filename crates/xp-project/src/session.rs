//! Turning a session document into a live phase store.

use crate::ProjectResult;
use crate::schema::{ConditionsDef, PhaseSourceDef, Session, ViewDef};
use std::path::Path;
use xp_core::units::{gpa, k};
use xp_phases::{
    PhaseLoader, PhaseStore, PositionUnit, ReflectionProjector, StoreConfig, StructureThresholds,
};

/// View settings resolved into projector terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView {
    pub projector: ReflectionProjector,
    pub unit: PositionUnit,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl ViewDef {
    pub fn resolve(&self) -> ProjectResult<SessionView> {
        Ok(SessionView {
            projector: ReflectionProjector::new(self.two_theta_deg),
            unit: self.unit.parse()?,
            x_range: (self.x_range[0], self.x_range[1]),
            y_range: (self.y_range[0], self.y_range[1]),
        })
    }
}

fn apply(store: &mut PhaseStore, index: usize, conditions: &ConditionsDef) -> ProjectResult<()> {
    store.set_conditions(
        index,
        Some(gpa(conditions.pressure_gpa)),
        Some(k(conditions.temperature_k)),
    )?;
    Ok(())
}

/// Build a store holding every phase of `session`, at the session's conditions.
///
/// Relative phase paths resolve against `base_dir` (normally the session file's directory).
pub fn build_store(
    session: &Session,
    base_dir: &Path,
    loader: &dyn PhaseLoader,
) -> ProjectResult<PhaseStore> {
    let mut store = PhaseStore::new(StoreConfig {
        same_conditions: session.same_conditions,
        ..StoreConfig::default()
    });

    for phase in &session.phases {
        let index = match &phase.source {
            PhaseSourceDef::Definition { path } => {
                store.add_from_definition_file(base_dir.join(path), loader)?
            }
            PhaseSourceDef::Structure {
                path,
                intensity_cutoff,
                minimum_d_spacing,
            } => store.add_from_structure_file(
                base_dir.join(path),
                StructureThresholds {
                    intensity_cutoff: *intensity_cutoff,
                    minimum_d_spacing: *minimum_d_spacing,
                },
                loader,
            )?,
            PhaseSourceDef::Inline { phase } => {
                let definition = phase.to_definition().map_err(|fault| {
                    crate::ValidationError::InvalidPhase {
                        phase: phase.name.clone(),
                        reason: fault.to_string(),
                    }
                })?;
                store.add_definition(definition, None)?
            }
        };
        if !phase.visible {
            store.set_visible(index, false)?;
        }
    }

    for (index, phase) in session.phases.iter().enumerate() {
        apply(
            &mut store,
            index,
            phase.conditions.as_ref().unwrap_or(&session.conditions),
        )?;
    }

    tracing::info!(session = %session.name, phases = store.len(), "session loaded");
    Ok(store)
}
