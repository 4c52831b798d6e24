//! Mapping between phase documents and the in-memory phase types.

use crate::schema::{CellDef, PhaseDoc, ReflectionDef};
use xp_eos::{describe, keys};
use xp_phases::{
    LoadFault, PhaseDefinition, PhaseEntry, Reflection, StructureThresholds, Symmetry, UnitCell,
};

fn finite(field: &str, value: f64) -> Result<f64, LoadFault> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoadFault::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

impl PhaseDoc {
    /// Checked conversion into a definition the store can build a phase from.
    ///
    /// An unknown EOS identifier is passed through; building the phase reports it.
    pub fn to_definition(&self) -> Result<PhaseDefinition, LoadFault> {
        if self.name.trim().is_empty() {
            return Err(LoadFault::MissingField {
                field: "name".into(),
            });
        }

        for (key, value) in &self.parameters {
            finite(key, *value)?;
        }
        if let Ok(variant) = describe(&self.eos) {
            for descriptor in variant.params {
                if descriptor.default.is_none() && !self.parameters.contains_key(descriptor.key) {
                    return Err(LoadFault::MissingField {
                        field: descriptor.key.to_string(),
                    });
                }
            }
        }
        // Every d-spacing scale factor divides by V0.
        if self.parameters.get(keys::V_0) == Some(&0.0) {
            return Err(LoadFault::ZeroDivision {
                what: keys::V_0.to_string(),
            });
        }

        let cell = self.cell.as_ref().map(CellDef::to_cell).transpose()?;
        let mut reflections = self
            .reflections
            .iter()
            .map(ReflectionDef::to_reflection)
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(cell) = &cell {
            for r in reflections.iter_mut().filter(|r| r.is_indexed()) {
                r.d0 = cell.d_spacing(r.h, r.k, r.l).map_err(|err| LoadFault::InvalidNumber {
                    field: "cell".into(),
                    value: err.to_string(),
                })?;
            }
        }

        Ok(PhaseDefinition {
            name: self.name.clone(),
            eos: self.eos.clone(),
            parameters: self.parameters.clone(),
            cell,
            reflections,
        })
    }

    /// Structure-derived definition: intensities normalised to 100, then filtered.
    pub fn to_structure_definition(
        &self,
        thresholds: StructureThresholds,
    ) -> Result<PhaseDefinition, LoadFault> {
        let mut definition = self.to_definition()?;
        let max = definition
            .reflections
            .iter()
            .map(|r| r.intensity)
            .fold(0.0_f64, f64::max);
        if max <= 0.0 {
            return Err(LoadFault::ZeroDivision {
                what: "intensity normalisation".into(),
            });
        }

        definition.reflections = definition
            .reflections
            .into_iter()
            .map(|mut r| {
                r.intensity *= 100.0 / max;
                r
            })
            .filter(|r| {
                r.intensity >= thresholds.intensity_cutoff
                    && r.d0 >= thresholds.minimum_d_spacing
            })
            .collect();
        tracing::debug!(
            phase = %definition.name,
            kept = definition.reflections.len(),
            total = self.reflections.len(),
            "structure reflections filtered"
        );
        Ok(definition)
    }

    /// Snapshot of a phase as currently edited, for saving.
    pub fn from_entry(entry: &PhaseEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            eos: entry.eos_kind().id().to_string(),
            parameters: entry
                .params()
                .iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            cell: entry.cell().map(CellDef::from_cell),
            reflections: entry
                .reflections()
                .iter()
                .map(|r| ReflectionDef {
                    h: r.h,
                    k: r.k,
                    l: r.l,
                    d0: r.d0,
                    intensity: r.intensity,
                })
                .collect(),
        }
    }
}

impl CellDef {
    pub fn to_cell(&self) -> Result<UnitCell, LoadFault> {
        let symmetry =
            Symmetry::parse(&self.symmetry).ok_or_else(|| LoadFault::InvalidNumber {
                field: "cell.symmetry".into(),
                value: self.symmetry.clone(),
            })?;
        let a = finite("cell.a", self.a)?;
        let b = finite("cell.b", self.b.unwrap_or(a))?;
        let c = finite("cell.c", self.c.unwrap_or(a))?;
        if a == 0.0 || b == 0.0 || c == 0.0 {
            return Err(LoadFault::ZeroDivision {
                what: "cell length".into(),
            });
        }
        let alpha = finite("cell.alpha", self.alpha.unwrap_or(90.0))?;
        let beta = finite("cell.beta", self.beta.unwrap_or(90.0))?;
        let gamma = finite("cell.gamma", self.gamma.unwrap_or(90.0))?;

        UnitCell::new(symmetry, a, b, c, alpha, beta, gamma).map_err(|err| {
            LoadFault::InvalidNumber {
                field: "cell".into(),
                value: err.to_string(),
            }
        })
    }

    pub fn from_cell(cell: &UnitCell) -> Self {
        Self {
            symmetry: cell.symmetry.name().to_string(),
            a: cell.a,
            b: Some(cell.b),
            c: Some(cell.c),
            alpha: Some(cell.alpha),
            beta: Some(cell.beta),
            gamma: Some(cell.gamma),
        }
    }
}

impl ReflectionDef {
    fn to_reflection(&self) -> Result<Reflection, LoadFault> {
        Ok(Reflection::new(
            self.h,
            self.k,
            self.l,
            finite("reflection.d0", self.d0)?,
            finite("reflection.intensity", self.intensity)?,
        ))
    }
}
