//! One crystalline phase: EOS parameters, cell, reflections and current conditions.

use crate::cell::UnitCell;
use crate::error::{PhaseError, PhaseResult};
use crate::reflection::{LineRow, Reflection};
use crate::source::{PhaseDefinition, PhaseLoader, PhaseOrigin};
use std::path::Path;
use xp_core::check_index;
use xp_core::constants::{ambient_pressure, reference_temperature};
use xp_core::units::{Pressure, Temperature};
use xp_eos::{EosKind, EosParameterSet, EosSolver, EosState, describe};

/// A phase whose derived state always matches its last accepted inputs.
///
/// Every mutator computes the new volumes first and commits only on success, so a failed
/// solve (for example a convergence failure) leaves volume, d-spacings, parameters and
/// conditions exactly as they were.
#[derive(Debug, Clone)]
pub struct PhaseEntry {
    name: String,
    params: EosParameterSet,
    cell: Option<UnitCell>,
    reflections: Vec<Reflection>,
    origin: Option<PhaseOrigin>,
    modified: bool,
    pressure: Pressure,
    temperature: Temperature,
    state: EosState,
    solver: EosSolver,
}

impl PhaseEntry {
    /// Phase without reflections at ambient conditions.
    pub fn new(name: impl Into<String>, params: EosParameterSet) -> PhaseResult<Self> {
        Self::assemble(
            name.into(),
            params,
            None,
            Vec::new(),
            None,
            EosSolver::default(),
        )
    }

    /// Phase from a loader result at ambient conditions.
    pub fn from_definition(
        definition: PhaseDefinition,
        origin: Option<PhaseOrigin>,
        solver: EosSolver,
    ) -> PhaseResult<Self> {
        let kind = describe(&definition.eos)?.kind;
        let params = EosParameterSet::new(kind, definition.parameters)?;
        Self::assemble(
            definition.name,
            params,
            definition.cell,
            definition.reflections,
            origin,
            solver,
        )
    }

    fn assemble(
        name: String,
        params: EosParameterSet,
        cell: Option<UnitCell>,
        reflections: Vec<Reflection>,
        origin: Option<PhaseOrigin>,
        solver: EosSolver,
    ) -> PhaseResult<Self> {
        let pressure = ambient_pressure();
        let temperature = reference_temperature();
        let state = solver.evaluate(&params, pressure, temperature)?;
        let mut entry = Self {
            name,
            params,
            cell,
            reflections,
            origin,
            modified: false,
            pressure,
            temperature,
            state,
            solver,
        };
        entry.refresh_d0()?;
        entry.refresh_lines();
        Ok(entry)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eos_kind(&self) -> EosKind {
        self.params.kind()
    }

    pub fn params(&self) -> &EosParameterSet {
        &self.params
    }

    pub fn cell(&self) -> Option<&UnitCell> {
        self.cell.as_ref()
    }

    pub fn reflections(&self) -> &[Reflection] {
        &self.reflections
    }

    pub fn reflection(&self, index: usize) -> PhaseResult<&Reflection> {
        check_index(index, self.reflections.len(), "reflection")?;
        Ok(&self.reflections[index])
    }

    pub fn origin(&self) -> Option<&PhaseOrigin> {
        self.origin.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.origin.as_ref().map(PhaseOrigin::path)
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn eos_state(&self) -> EosState {
        self.state
    }

    /// Volume at the current conditions.
    pub fn volume(&self) -> f64 {
        self.state.v
    }

    /// Zero-pressure volume at the current temperature.
    pub fn zero_pressure_volume(&self) -> f64 {
        self.state.v0_t
    }

    /// Volume at the reference conditions (P = 0, T = 300 K).
    pub fn reference_volume(&self) -> f64 {
        self.state.v0
    }

    /// `(V / V0)^(1/3)` currently applied to every reflection.
    pub fn scale_factor(&self) -> f64 {
        self.state.scale_factor()
    }

    /// Shear modulus at the current conditions; only `slb2` has a shear law.
    pub fn shear_modulus(&self) -> PhaseResult<Pressure> {
        Ok(self
            .solver
            .shear_modulus(&self.params, self.pressure, self.temperature)?)
    }

    /// Rows `(d, intensity, h, k, l)` for display.
    pub fn lines_table(&self) -> Vec<LineRow> {
        self.reflections.iter().map(LineRow::from).collect()
    }

    /// Move to new conditions; `None` keeps the current value. Not a structural edit.
    pub fn set_conditions(
        &mut self,
        pressure: Option<Pressure>,
        temperature: Option<Temperature>,
    ) -> PhaseResult<()> {
        let pressure = pressure.unwrap_or(self.pressure);
        let temperature = temperature.unwrap_or(self.temperature);
        let state = self.solver.evaluate(&self.params, pressure, temperature)?;

        self.pressure = pressure;
        self.temperature = temperature;
        self.state = state;
        self.refresh_lines();
        tracing::debug!(phase = %self.name, v = state.v, "conditions applied");
        Ok(())
    }

    /// Change one EOS or cell parameter (`a0`, `b0`, ... when the phase has a cell).
    ///
    /// Keys declared by neither the variant nor the cell fail with `UnknownParameter`.
    pub fn set_parameter(&mut self, key: &str, value: f64) -> PhaseResult<()> {
        if let Some(cell) = self.cell {
            if let Some(new_cell) = cell.with(key, value)? {
                let d0 = Self::derived_d0(&new_cell, &self.reflections)?;
                self.cell = Some(new_cell);
                for (reflection, d0) in self.reflections.iter_mut().zip(d0) {
                    reflection.d0 = d0;
                }
                self.modified = true;
                self.refresh_lines();
                return Ok(());
            }
        }

        if !self.params.variant().has_parameter(key) {
            tracing::warn!(phase = %self.name, key, "rejected unknown parameter");
            return Err(PhaseError::UnknownParameter {
                key: key.to_string(),
                eos: self.params.kind().id(),
            });
        }

        let mut params = self.params.clone();
        params.set(key, value)?;
        let state = self.solver.evaluate(&params, self.pressure, self.temperature)?;

        self.params = params;
        self.state = state;
        self.modified = true;
        self.refresh_lines();
        tracing::debug!(phase = %self.name, key, value, "parameter changed");
        Ok(())
    }

    /// Append an empty reflection; returns its index.
    pub fn add_reflection(&mut self) -> usize {
        self.push_reflection(Reflection::empty())
    }

    /// Append a reflection; its d0 is re-derived from the cell when indexed.
    pub fn push_reflection(&mut self, mut reflection: Reflection) -> usize {
        if let Some(d0) = self.cell_d0(&reflection) {
            reflection.d0 = d0;
        }
        reflection.rescale(self.scale_factor());
        self.reflections.push(reflection);
        self.modified = true;
        self.reflections.len() - 1
    }

    pub fn delete_reflection(&mut self, index: usize) -> PhaseResult<Reflection> {
        check_index(index, self.reflections.len(), "reflection")?;
        let removed = self.reflections.remove(index);
        self.modified = true;
        self.refresh_lines();
        Ok(removed)
    }

    /// Replace the reflection at `index`; the zero-pressure reference is recomputed.
    pub fn update_reflection(&mut self, index: usize, reflection: Reflection) -> PhaseResult<()> {
        check_index(index, self.reflections.len(), "reflection")?;
        let previous = std::mem::replace(&mut self.reflections[index], reflection);
        if let Err(err) = self.refresh_d0() {
            self.reflections[index] = previous;
            return Err(err);
        }
        self.modified = true;
        self.refresh_lines();
        Ok(())
    }

    /// Re-read the recorded origin and replace parameters, cell and reflections wholesale.
    ///
    /// Current conditions survive; unsaved edits do not.
    pub fn reload_from_source(&mut self, loader: &dyn PhaseLoader) -> PhaseResult<()> {
        let origin = self.origin.clone().ok_or(PhaseError::SourceUnavailable)?;
        let definition = origin.load(loader)?;

        let mut fresh = Self::from_definition(definition, Some(origin), self.solver.clone())?;
        fresh.set_conditions(Some(self.pressure), Some(self.temperature))?;
        *self = fresh;
        tracing::debug!(phase = %self.name, lines = self.reflections.len(), "phase reloaded");
        Ok(())
    }

    fn cell_d0(&self, reflection: &Reflection) -> Option<f64> {
        let cell = self.cell.as_ref()?;
        if !reflection.is_indexed() {
            return None;
        }
        cell.d_spacing(reflection.h, reflection.k, reflection.l).ok()
    }

    fn derived_d0(cell: &UnitCell, reflections: &[Reflection]) -> PhaseResult<Vec<f64>> {
        reflections
            .iter()
            .map(|r| {
                if r.is_indexed() {
                    cell.d_spacing(r.h, r.k, r.l)
                } else {
                    Ok(r.d0)
                }
            })
            .collect()
    }

    /// Re-derive d0 of indexed reflections from the cell, if there is one.
    fn refresh_d0(&mut self) -> PhaseResult<()> {
        if let Some(cell) = self.cell {
            let d0 = Self::derived_d0(&cell, &self.reflections)?;
            for (reflection, d0) in self.reflections.iter_mut().zip(d0) {
                reflection.d0 = d0;
            }
        }
        Ok(())
    }

    fn refresh_lines(&mut self) {
        let scale = self.scale_factor();
        for reflection in &mut self.reflections {
            reflection.rescale(scale);
        }
    }
}
