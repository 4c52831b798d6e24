//! Ordered phase collection with per-phase display metadata and change notification.

use crate::color::{ColorAllocator, Rgb};
use crate::entry::PhaseEntry;
use crate::error::PhaseResult;
use crate::events::{ObserverList, PhaseEvent, PhaseObserver};
use crate::reflection::{LineRow, Reflection};
use crate::source::{PhaseDefinition, PhaseLoader, PhaseOrigin, StructureThresholds};
use std::path::{Path, PathBuf};
use xp_core::check_index;
use xp_core::constants::{ambient_pressure, reference_temperature};
use xp_core::units::{Pressure, Temperature, in_gpa, in_kelvin};
use xp_core::ObserverId;
use xp_eos::EosSolver;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    /// New phases inherit the conditions of the last phase instead of starting at ambient.
    pub same_conditions: bool,
    pub ambient_pressure: Pressure,
    pub ambient_temperature: Temperature,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            same_conditions: true,
            ambient_pressure: ambient_pressure(),
            ambient_temperature: reference_temperature(),
        }
    }
}

/// One phase together with the metadata that travels with it.
#[derive(Debug, Clone)]
struct PhaseSlot {
    entry: PhaseEntry,
    color: Rgb,
    visible: bool,
}

/// Sole owner and mutator of all phase state.
///
/// Phases are addressed by position; removing a phase shifts every later index down by one.
/// Each mutation finishes (derived state included) before observers are notified, and
/// notifications are delivered before the call returns.
#[derive(Debug, Default)]
pub struct PhaseStore {
    config: StoreConfig,
    solver: EosSolver,
    slots: Vec<PhaseSlot>,
    colors: ColorAllocator,
    observers: ObserverList,
}

impl PhaseStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Store drawing colours from `colors` rather than a fresh allocator.
    pub fn with_allocator(config: StoreConfig, colors: ColorAllocator) -> Self {
        Self {
            config,
            colors,
            ..Self::default()
        }
    }

    /// Solver used for phases created by the store itself.
    pub fn with_solver(mut self, solver: EosSolver) -> Self {
        self.solver = solver;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn same_conditions(&self) -> bool {
        self.config.same_conditions
    }

    pub fn set_same_conditions(&mut self, enabled: bool) {
        self.config.same_conditions = enabled;
    }

    pub fn allocator(&self) -> &ColorAllocator {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn subscribe(&mut self, observer: impl PhaseObserver + 'static) -> ObserverId {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn slot(&self, index: usize) -> PhaseResult<&PhaseSlot> {
        check_index(index, self.slots.len(), "phase")?;
        Ok(&self.slots[index])
    }

    fn slot_mut(&mut self, index: usize) -> PhaseResult<&mut PhaseSlot> {
        check_index(index, self.slots.len(), "phase")?;
        Ok(&mut self.slots[index])
    }

    pub fn entry(&self, index: usize) -> PhaseResult<&PhaseEntry> {
        Ok(&self.slot(index)?.entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = &PhaseEntry> {
        self.slots.iter().map(|slot| &slot.entry)
    }

    pub fn color(&self, index: usize) -> PhaseResult<Rgb> {
        Ok(self.slot(index)?.color)
    }

    pub fn is_visible(&self, index: usize) -> PhaseResult<bool> {
        Ok(self.slot(index)?.visible)
    }

    pub fn source_path(&self, index: usize) -> PhaseResult<Option<&Path>> {
        Ok(self.slot(index)?.entry.source_path())
    }

    /// Append a phase and return its index.
    ///
    /// The phase is first moved to its starting conditions; if that solve fails nothing is
    /// appended and no colour is consumed.
    pub fn add_phase(&mut self, mut entry: PhaseEntry) -> PhaseResult<usize> {
        let (pressure, temperature) = match self.slots.last() {
            Some(last) if self.config.same_conditions => {
                (last.entry.pressure(), last.entry.temperature())
            }
            _ => (self.config.ambient_pressure, self.config.ambient_temperature),
        };
        entry.set_conditions(Some(pressure), Some(temperature))?;

        let color = self.colors.next_color();
        tracing::debug!(
            phase = entry.name(),
            pressure_gpa = in_gpa(pressure),
            temperature_k = in_kelvin(temperature),
            ?color,
            "phase added"
        );
        self.slots.push(PhaseSlot {
            entry,
            color,
            visible: true,
        });
        let index = self.slots.len() - 1;
        self.observers.emit(PhaseEvent::PhaseAdded);
        self.observers.emit(PhaseEvent::PhaseChanged(index));
        Ok(index)
    }

    /// Build a phase from an already loaded definition and append it.
    pub fn add_definition(
        &mut self,
        definition: PhaseDefinition,
        origin: Option<PhaseOrigin>,
    ) -> PhaseResult<usize> {
        let entry = PhaseEntry::from_definition(definition, origin, self.solver.clone())?;
        self.add_phase(entry)
    }

    /// Load a phase-definition file and append it; the store is unchanged on failure.
    pub fn add_from_definition_file(
        &mut self,
        path: impl Into<PathBuf>,
        loader: &dyn PhaseLoader,
    ) -> PhaseResult<usize> {
        let origin = PhaseOrigin::Definition(path.into());
        let definition = origin.load(loader)?;
        self.add_definition(definition, Some(origin))
    }

    /// Convert a structure file and append the result; the store is unchanged on failure.
    pub fn add_from_structure_file(
        &mut self,
        path: impl Into<PathBuf>,
        thresholds: StructureThresholds,
        converter: &dyn PhaseLoader,
    ) -> PhaseResult<usize> {
        let origin = PhaseOrigin::Structure {
            path: path.into(),
            thresholds,
        };
        let definition = origin.load(converter)?;
        self.add_definition(definition, Some(origin))
    }

    /// Remove a phase; later indices shift down by one.
    pub fn remove_phase(&mut self, index: usize) -> PhaseResult<PhaseEntry> {
        check_index(index, self.slots.len(), "phase")?;
        let slot = self.slots.remove(index);
        tracing::debug!(phase = slot.entry.name(), index, "phase removed");
        self.observers.emit(PhaseEvent::PhaseRemoved(index));
        Ok(slot.entry)
    }

    /// Remove every phase, one `PhaseRemoved(0)` per phase.
    pub fn reset(&mut self) {
        while !self.slots.is_empty() {
            self.slots.remove(0);
            self.observers.emit(PhaseEvent::PhaseRemoved(0));
        }
    }

    /// Replace a phase with a fresh read of its origin, keeping its index, colour and conditions.
    pub fn reload(&mut self, index: usize, loader: &dyn PhaseLoader) -> PhaseResult<()> {
        let slot = self.slot_mut(index)?;
        let old_lines = slot.entry.reflections().len();
        slot.entry.reload_from_source(loader)?;
        let new_lines = slot.entry.reflections().len();

        for _ in 0..old_lines {
            self.observers.emit(PhaseEvent::ReflectionDeleted {
                phase: index,
                reflection: 0,
            });
        }
        for _ in 0..new_lines {
            self.observers.emit(PhaseEvent::ReflectionAdded(index));
        }
        self.observers.emit(PhaseEvent::PhaseReloaded(index));
        self.observers.emit(PhaseEvent::PhaseChanged(index));
        Ok(())
    }

    /// Move one phase to new conditions; `None` keeps the current value.
    pub fn set_conditions(
        &mut self,
        index: usize,
        pressure: Option<Pressure>,
        temperature: Option<Temperature>,
    ) -> PhaseResult<()> {
        self.slot_mut(index)?
            .entry
            .set_conditions(pressure, temperature)?;
        self.observers.emit(PhaseEvent::PhaseChanged(index));
        Ok(())
    }

    /// Apply `pressure` to every phase regardless of `same_conditions`.
    ///
    /// Every phase is attempted; phases whose solve fails keep their previous state and the
    /// first failure is returned after the rest have been updated.
    pub fn set_pressure_all(&mut self, pressure: Pressure) -> PhaseResult<()> {
        self.broadcast(|entry| entry.set_conditions(Some(pressure), None))
    }

    /// Apply `temperature` to every phase; failures are handled as in
    /// [`set_pressure_all`](Self::set_pressure_all).
    pub fn set_temperature_all(&mut self, temperature: Temperature) -> PhaseResult<()> {
        self.broadcast(|entry| entry.set_conditions(None, Some(temperature)))
    }

    fn broadcast<F>(&mut self, mut apply: F) -> PhaseResult<()>
    where
        F: FnMut(&mut PhaseEntry) -> PhaseResult<()>,
    {
        let mut first_error = None;
        for index in 0..self.slots.len() {
            match apply(&mut self.slots[index].entry) {
                Ok(()) => self.observers.emit(PhaseEvent::PhaseChanged(index)),
                Err(err) => {
                    tracing::warn!(
                        phase = self.slots[index].entry.name(),
                        index,
                        error = %err,
                        "conditions not applied"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn set_parameter(&mut self, index: usize, key: &str, value: f64) -> PhaseResult<()> {
        self.slot_mut(index)?.entry.set_parameter(key, value)?;
        self.observers.emit(PhaseEvent::PhaseChanged(index));
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, color: Rgb) -> PhaseResult<()> {
        self.slot_mut(index)?.color = color;
        self.observers.emit(PhaseEvent::PhaseChanged(index));
        Ok(())
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) -> PhaseResult<()> {
        self.slot_mut(index)?.visible = visible;
        self.observers.emit(PhaseEvent::PhaseChanged(index));
        Ok(())
    }

    /// Append an empty reflection to a phase; returns the reflection index.
    pub fn add_reflection(&mut self, phase: usize) -> PhaseResult<usize> {
        let reflection = self.slot_mut(phase)?.entry.add_reflection();
        self.observers.emit(PhaseEvent::ReflectionAdded(phase));
        Ok(reflection)
    }

    pub fn delete_reflection(&mut self, phase: usize, reflection: usize) -> PhaseResult<Reflection> {
        let removed = self.slot_mut(phase)?.entry.delete_reflection(reflection)?;
        self.observers
            .emit(PhaseEvent::ReflectionDeleted { phase, reflection });
        Ok(removed)
    }

    /// Delete several reflections addressed by their current indices.
    ///
    /// All indices are checked before anything is removed. Removal runs from the highest
    /// index down so earlier deletions never shift the later targets; duplicates count once.
    pub fn delete_reflections(&mut self, phase: usize, indices: &[usize]) -> PhaseResult<()> {
        let len = self.entry(phase)?.reflections().len();
        for &index in indices {
            check_index(index, len, "reflection")?;
        }

        let mut ordered = indices.to_vec();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        ordered.dedup();
        for reflection in ordered {
            self.delete_reflection(phase, reflection)?;
        }
        Ok(())
    }

    /// Delete every reflection of a phase, emitting `ReflectionDeleted` at index 0 for each.
    pub fn clear_reflections(&mut self, phase: usize) -> PhaseResult<()> {
        while !self.entry(phase)?.reflections().is_empty() {
            self.delete_reflection(phase, 0)?;
        }
        Ok(())
    }

    pub fn update_reflection(
        &mut self,
        phase: usize,
        index: usize,
        reflection: Reflection,
    ) -> PhaseResult<()> {
        self.slot_mut(phase)?
            .entry
            .update_reflection(index, reflection)?;
        self.observers.emit(PhaseEvent::PhaseChanged(phase));
        Ok(())
    }

    pub fn lines_table(&self, phase: usize) -> PhaseResult<Vec<LineRow>> {
        Ok(self.entry(phase)?.lines_table())
    }
}
