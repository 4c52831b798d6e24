//! End-to-end behaviour of the phase store as seen by an observer.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::cell::RefCell;

use xp_core::units::{gpa, in_gpa, in_kelvin, k};
use xp_eos::keys;
use xp_phases::{
    ColorAllocator, LoadFault, PhaseDefinition, PhaseError, PhaseEvent, PhaseLoader, PhaseStore,
    Reflection, StoreConfig, StructureThresholds,
};

fn bm3(name: &str, reflections: Vec<Reflection>) -> PhaseDefinition {
    PhaseDefinition {
        name: name.into(),
        eos: "bm3".into(),
        parameters: BTreeMap::from([
            (keys::V_0.to_string(), 10.0),
            (keys::K_0.to_string(), 100.0),
            (keys::KPRIME_0.to_string(), 4.0),
        ]),
        cell: None,
        reflections,
    }
}

fn jcpds4(name: &str, reflections: Vec<Reflection>) -> PhaseDefinition {
    PhaseDefinition {
        name: name.into(),
        eos: "jcpds4".into(),
        parameters: BTreeMap::from([
            (keys::V_0.to_string(), 74.7),
            (keys::K_0.to_string(), 160.0),
            (keys::DK0_DT.to_string(), -0.02),
            (keys::ALPHA_T0.to_string(), 3.0e-5),
        ]),
        cell: None,
        reflections,
    }
}

fn slb2(name: &str, reflections: Vec<Reflection>) -> PhaseDefinition {
    PhaseDefinition {
        name: name.into(),
        eos: "slb2".into(),
        parameters: BTreeMap::from([
            (keys::V_0.to_string(), 11.24e-6),
            (keys::K_0.to_string(), 161.0e9),
            (keys::KPRIME_0.to_string(), 3.8),
            (keys::G_0.to_string(), 131.0e9),
            (keys::GPRIME_0.to_string(), 2.1),
            (keys::MOLAR_MASS.to_string(), 0.0403),
            (keys::N.to_string(), 2.0),
            (keys::DEBYE_0.to_string(), 767.0),
            (keys::GRUENEISEN_0.to_string(), 1.36),
            (keys::Q_0.to_string(), 1.7),
            (keys::ETA_S_0.to_string(), 2.8),
        ]),
        cell: None,
        reflections,
    }
}

fn lines() -> Vec<Reflection> {
    vec![
        Reflection::new(1, 1, 1, 2.43, 10.0),
        Reflection::new(2, 0, 0, 2.11, 100.0),
        Reflection::new(2, 2, 0, 1.49, 50.0),
    ]
}

fn watched(store: &mut PhaseStore) -> Receiver<PhaseEvent> {
    let (tx, rx) = channel();
    store.subscribe(tx);
    rx
}

fn assert_lines_consistent(store: &PhaseStore) {
    for entry in store.entries() {
        let scale = (entry.volume() / entry.reference_volume()).cbrt();
        for r in entry.reflections() {
            assert!((r.d() - r.d0 * scale).abs() <= 1e-12 * r.d0.abs().max(1.0));
        }
    }
}

/// Serves definitions from memory; the contents can be swapped between calls.
#[derive(Default)]
struct MemoryLoader {
    files: RefCell<HashMap<PathBuf, PhaseDefinition>>,
    converted: RefCell<Vec<StructureThresholds>>,
}

impl MemoryLoader {
    fn put(&self, path: &str, definition: PhaseDefinition) {
        self.files.borrow_mut().insert(path.into(), definition);
    }
}

impl PhaseLoader for MemoryLoader {
    fn load_definition(&self, path: &Path) -> Result<PhaseDefinition, LoadFault> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| LoadFault::MissingField {
                field: "reflections".into(),
            })
    }

    fn convert_structure(
        &self,
        path: &Path,
        thresholds: StructureThresholds,
    ) -> Result<PhaseDefinition, LoadFault> {
        self.converted.borrow_mut().push(thresholds);
        self.load_definition(path)
    }
}

#[test]
fn compression_scenario_emits_one_change() {
    let mut store = PhaseStore::default();
    store
        .add_definition(bm3("a", vec![Reflection::new(1, 1, 1, 2.5, 50.0)]), None)
        .unwrap();
    let rx = watched(&mut store);

    store.set_conditions(0, Some(gpa(5.0)), None).unwrap();

    let entry = store.entry(0).unwrap();
    assert!(entry.volume() < 10.0);
    assert!(entry.reflections()[0].d() < 2.5);
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![PhaseEvent::PhaseChanged(0)]);
}

#[test]
fn new_phase_inherits_previous_conditions() {
    let mut store = PhaseStore::new(StoreConfig::default());
    assert!(store.same_conditions());
    store.add_definition(bm3("a", Vec::new()), None).unwrap();
    store.set_conditions(0, Some(gpa(2.0)), Some(k(300.0))).unwrap();

    let rx = watched(&mut store);
    let b = store.add_definition(bm3("b", Vec::new()), None).unwrap();

    let entry = store.entry(b).unwrap();
    assert!((in_gpa(entry.pressure()) - 2.0).abs() < 1e-12);
    assert_eq!(in_kelvin(entry.temperature()), 300.0);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![PhaseEvent::PhaseAdded, PhaseEvent::PhaseChanged(1)]
    );
}

#[test]
fn empty_store_starts_new_phases_at_ambient() {
    let mut store = PhaseStore::new(StoreConfig {
        same_conditions: true,
        ambient_pressure: gpa(1.5),
        ambient_temperature: k(700.0),
    });
    let a = store.add_definition(jcpds4("a", lines()), None).unwrap();

    let entry = store.entry(a).unwrap();
    assert!((in_gpa(entry.pressure()) - 1.5).abs() < 1e-12);
    assert!((in_kelvin(entry.temperature()) - 700.0).abs() < 1e-12);
    assert_lines_consistent(&store);

    let mut store = PhaseStore::default();
    store.add_definition(bm3("b", Vec::new()), None).unwrap();
    let entry = store.entry(0).unwrap();
    assert_eq!(in_gpa(entry.pressure()), 0.0);
    assert_eq!(in_kelvin(entry.temperature()), 300.0);
}

#[test]
fn stores_sharing_an_allocator_get_distinct_colours() {
    let shared = ColorAllocator::default();
    let mut first = PhaseStore::with_allocator(StoreConfig::default(), shared.clone());
    let mut second = PhaseStore::with_allocator(StoreConfig::default(), shared.clone());

    first.add_definition(bm3("a", Vec::new()), None).unwrap();
    second.add_definition(bm3("b", Vec::new()), None).unwrap();
    first.add_definition(bm3("c", Vec::new()), None).unwrap();

    let colours = HashSet::from([
        first.color(0).unwrap(),
        second.color(0).unwrap(),
        first.color(1).unwrap(),
    ]);
    assert_eq!(colours.len(), 3);
    assert_eq!(shared.allocated(), 3);
}

#[test]
fn colours_are_never_reused() {
    let mut store = PhaseStore::default();
    let mut seen = HashSet::new();
    for round in 0..6 {
        let i = store.add_definition(bm3("p", Vec::new()), None).unwrap();
        assert!(seen.insert(store.color(i).unwrap()), "colour reused in round {round}");
        if round % 2 == 1 {
            store.remove_phase(0).unwrap();
        }
    }
    assert_eq!(store.allocator().allocated(), 6);
}

#[test]
fn deleting_index_zero_empties_the_phase() {
    let n = 4;
    let lines = (1..=n)
        .map(|i| Reflection::new(i, 0, 0, 2.5 / i as f64, 10.0 * i as f64))
        .collect();
    let mut store = PhaseStore::default();
    store.add_definition(bm3("a", lines), None).unwrap();
    let rx = watched(&mut store);

    for _ in 0..n {
        store.delete_reflection(0, 0).unwrap();
    }
    assert!(store.entry(0).unwrap().reflections().is_empty());
    assert!(store.lines_table(0).unwrap().is_empty());

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(events.len(), n as usize);
    assert!(events.iter().all(|e| *e
        == PhaseEvent::ReflectionDeleted {
            phase: 0,
            reflection: 0
        }));

    // Empty sequence: index 0 is now out of range, clearing is a no-op.
    assert!(matches!(
        store.delete_reflection(0, 0),
        Err(PhaseError::IndexOutOfRange { what: "reflection", .. })
    ));
    store.clear_reflections(0).unwrap();
}

#[test]
fn clearing_reflections_reports_each_deletion() {
    let mut store = PhaseStore::default();
    store.add_definition(bm3("a", lines()), None).unwrap();
    let rx = watched(&mut store);

    store.clear_reflections(0).unwrap();

    assert!(store.entry(0).unwrap().reflections().is_empty());
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![PhaseEvent::ReflectionDeleted { phase: 0, reflection: 0 }; 3]
    );
    assert!(store.clear_reflections(1).is_err());
}

#[test]
fn batched_delete_reports_highest_index_first() {
    let lines = (0..5)
        .map(|i| Reflection::new(1, 0, i, 2.5 - 0.1 * i as f64, 50.0))
        .collect();
    let mut store = PhaseStore::default();
    store.add_definition(bm3("a", lines), None).unwrap();
    let rx = watched(&mut store);

    store.delete_reflections(0, &[1, 3, 1]).unwrap();
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![
            PhaseEvent::ReflectionDeleted { phase: 0, reflection: 3 },
            PhaseEvent::ReflectionDeleted { phase: 0, reflection: 1 },
        ]
    );
    let l: Vec<i32> = store.entry(0).unwrap().reflections().iter().map(|r| r.l).collect();
    assert_eq!(l, vec![0, 2, 4]);
    assert_lines_consistent(&store);

    // One bad index rejects the whole batch before anything is removed.
    assert!(store.delete_reflections(0, &[0, 9]).is_err());
    assert_eq!(store.entry(0).unwrap().reflections().len(), 3);
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn pressure_broadcast_moves_every_phase() {
    let mut store = PhaseStore::default();
    store.add_definition(bm3("a", lines()), None).unwrap();
    store.add_definition(jcpds4("b", lines()), None).unwrap();
    store.add_definition(slb2("c", lines()), None).unwrap();
    let before: Vec<f64> = store.entries().map(|e| e.volume()).collect();
    let rx = watched(&mut store);

    store.set_pressure_all(gpa(10.0)).unwrap();

    for (entry, v_before) in store.entries().zip(before) {
        assert!((in_gpa(entry.pressure()) - 10.0).abs() < 1e-9);
        assert!(entry.volume() < v_before, "{} did not compress", entry.name());
    }
    assert_lines_consistent(&store);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![
            PhaseEvent::PhaseChanged(0),
            PhaseEvent::PhaseChanged(1),
            PhaseEvent::PhaseChanged(2),
        ]
    );
}

#[test]
fn temperature_broadcast_expands_thermal_phases_only() {
    let mut store = PhaseStore::default();
    store.add_definition(bm3("cold", lines()), None).unwrap();
    store.add_definition(jcpds4("mgo", lines()), None).unwrap();
    store.add_definition(slb2("periclase", lines()), None).unwrap();
    store.set_pressure_all(gpa(5.0)).unwrap();
    let before: Vec<f64> = store.entries().map(|e| e.volume()).collect();
    let rx = watched(&mut store);

    store.set_temperature_all(k(1500.0)).unwrap();

    let after: Vec<f64> = store.entries().map(|e| e.volume()).collect();
    assert_eq!(after[0], before[0]);
    assert!(after[1] > before[1]);
    assert!(after[2] > before[2]);
    for entry in store.entries() {
        assert!((in_kelvin(entry.temperature()) - 1500.0).abs() < 1e-9);
        assert!((in_gpa(entry.pressure()) - 5.0).abs() < 1e-9);
    }
    assert_lines_consistent(&store);
    assert_eq!(rx.try_iter().count(), 3);
}

#[test]
fn zero_kelvin_only_fails_for_thermal_phases() {
    let mut store = PhaseStore::default();
    store.add_definition(bm3("a", lines()), None).unwrap();
    store.set_temperature_all(k(0.0)).unwrap();
    assert_eq!(in_kelvin(store.entry(0).unwrap().temperature()), 0.0);

    store.set_temperature_all(k(300.0)).unwrap();
    store.add_definition(jcpds4("b", lines()), None).unwrap();
    assert!(store.set_temperature_all(k(0.0)).is_err());
    assert_eq!(in_kelvin(store.entry(0).unwrap().temperature()), 0.0);
    assert_eq!(in_kelvin(store.entry(1).unwrap().temperature()), 300.0);
}

#[test]
fn unknown_parameter_is_rejected_without_notifying() {
    let mut store = PhaseStore::default();
    store.add_definition(bm3("a", lines()), None).unwrap();
    let rx = watched(&mut store);

    let err = store.set_parameter(0, "K0", 150.0).unwrap_err();
    assert!(matches!(err, PhaseError::UnknownParameter { .. }));
    assert!(!store.entry(0).unwrap().is_modified());
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn reload_without_source_leaves_phase_untouched() {
    let mut store = PhaseStore::default();
    store
        .add_definition(bm3("a", vec![Reflection::new(1, 1, 1, 2.5, 50.0)]), None)
        .unwrap();
    store.set_parameter(0, keys::K_0, 120.0).unwrap();
    let before = store.lines_table(0).unwrap();
    let rx = watched(&mut store);

    let err = store.reload(0, &MemoryLoader::default()).unwrap_err();
    assert_eq!(err, PhaseError::SourceUnavailable);
    assert_eq!(store.lines_table(0).unwrap(), before);
    assert_eq!(store.entry(0).unwrap().params().get(keys::K_0).unwrap(), 120.0);
    assert!(store.entry(0).unwrap().is_modified());
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn reload_replaces_contents_and_keeps_conditions() {
    let loader = MemoryLoader::default();
    loader.put(
        "/phases/mgo.yaml",
        bm3("mgo", vec![Reflection::new(2, 0, 0, 2.1, 100.0)]),
    );

    let mut store = PhaseStore::default();
    let i = store
        .add_from_definition_file("/phases/mgo.yaml", &loader)
        .unwrap();
    store.set_conditions(i, Some(gpa(3.0)), None).unwrap();
    store.add_reflection(i).unwrap();
    store.set_parameter(i, keys::K_0, 300.0).unwrap();
    let color = store.color(i).unwrap();

    loader.put(
        "/phases/mgo.yaml",
        bm3(
            "mgo",
            vec![
                Reflection::new(2, 0, 0, 2.1, 100.0),
                Reflection::new(2, 2, 0, 1.49, 60.0),
                Reflection::new(2, 2, 2, 1.22, 15.0),
            ],
        ),
    );
    let rx = watched(&mut store);
    store.reload(i, &loader).unwrap();

    let entry = store.entry(i).unwrap();
    assert_eq!(entry.reflections().len(), 3);
    assert_eq!(entry.params().get(keys::K_0).unwrap(), 100.0);
    assert!(!entry.is_modified());
    assert!((in_gpa(entry.pressure()) - 3.0).abs() < 1e-12);
    assert_eq!(store.color(i).unwrap(), color);
    assert_eq!(
        store.source_path(i).unwrap(),
        Some(Path::new("/phases/mgo.yaml"))
    );
    assert_lines_consistent(&store);

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            PhaseEvent::ReflectionDeleted { phase: 0, reflection: 0 },
            PhaseEvent::ReflectionDeleted { phase: 0, reflection: 0 },
            PhaseEvent::ReflectionAdded(0),
            PhaseEvent::ReflectionAdded(0),
            PhaseEvent::ReflectionAdded(0),
            PhaseEvent::PhaseReloaded(0),
            PhaseEvent::PhaseChanged(0),
        ]
    );
}

#[test]
fn failed_load_adds_nothing() {
    let mut store = PhaseStore::default();
    let rx = watched(&mut store);
    let err = store
        .add_from_definition_file("/missing.yaml", &MemoryLoader::default())
        .unwrap_err();
    match err {
        PhaseError::Load { filename, source } => {
            assert_eq!(filename, PathBuf::from("/missing.yaml"));
            assert!(matches!(source, LoadFault::MissingField { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(store.is_empty());
    assert_eq!(store.allocator().allocated(), 0);
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn structure_thresholds_are_replayed_on_reload() {
    let loader = MemoryLoader::default();
    loader.put("/cif/quartz.cif", bm3("quartz", Vec::new()));
    let thresholds = StructureThresholds {
        intensity_cutoff: 2.0,
        minimum_d_spacing: 0.8,
    };

    let mut store = PhaseStore::default();
    store
        .add_from_structure_file("/cif/quartz.cif", thresholds, &loader)
        .unwrap();
    store.reload(0, &loader).unwrap();

    assert_eq!(*loader.converted.borrow(), vec![thresholds, thresholds]);
}

#[test]
fn reset_removes_one_phase_at_a_time() {
    let mut store = PhaseStore::default();
    for name in ["a", "b", "c"] {
        store.add_definition(bm3(name, Vec::new()), None).unwrap();
    }
    let rx = watched(&mut store);
    store.reset();
    assert!(store.is_empty());
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![PhaseEvent::PhaseRemoved(0); 3]
    );
}

#[test]
fn metadata_edits_notify() {
    let mut store = PhaseStore::default();
    store.add_definition(bm3("a", Vec::new()), None).unwrap();
    let rx = watched(&mut store);

    store.set_visible(0, false).unwrap();
    store.set_color(0, xp_phases::Rgb::new(10, 20, 30)).unwrap();
    assert!(store.set_visible(3, true).is_err());

    assert_eq!(store.color(0).unwrap(), xp_phases::Rgb::new(10, 20, 30));
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![PhaseEvent::PhaseChanged(0), PhaseEvent::PhaseChanged(0)]
    );
}

#[derive(Debug, Clone)]
enum Edit {
    Conditions(f64, f64),
    Stiffness(f64),
    Add,
    Delete(usize),
    Update(usize, f64),
}

/// Starting phase for each catalog variant, with the unit its bulk modulus is tabulated in.
fn seed_phase(variant: usize) -> (PhaseDefinition, f64) {
    let reflections = vec![
        Reflection::new(1, 1, 1, 2.5, 50.0),
        Reflection::new(2, 0, 0, 2.1, 80.0),
    ];
    match variant {
        0 => (bm3("p", reflections), 1.0),
        1 => (jcpds4("p", reflections), 1.0),
        _ => (slb2("p", reflections), 1.0e9),
    }
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0.0..50.0f64, 300.0..1500.0f64).prop_map(|(p, t)| Edit::Conditions(p, t)),
        (50.0..400.0f64).prop_map(Edit::Stiffness),
        Just(Edit::Add),
        (0usize..8).prop_map(Edit::Delete),
        (0usize..8, 0.5..4.0f64).prop_map(|(i, d0)| Edit::Update(i, d0)),
    ]
}

proptest! {
    #[test]
    fn d_spacings_track_volume_after_any_edit(
        variant in 0usize..3,
        edits in prop::collection::vec(edit(), 1..25),
    ) {
        let (definition, modulus_unit) = seed_phase(variant);
        let mut store = PhaseStore::default();
        store.add_definition(definition, None).unwrap();

        for edit in edits {
            // Out-of-range indices are expected to fail without side effects.
            let _ = match edit {
                Edit::Conditions(p, t) => store.set_conditions(0, Some(gpa(p)), Some(k(t))),
                Edit::Stiffness(k0) => store.set_parameter(0, keys::K_0, k0 * modulus_unit),
                Edit::Add => store.add_reflection(0).map(|_| ()),
                Edit::Delete(i) => store.delete_reflection(0, i).map(|_| ()),
                Edit::Update(i, d0) => {
                    store.update_reflection(0, i, Reflection::new(1, 0, 0, d0, 10.0))
                }
            };
            assert_lines_consistent(&store);
        }
    }
}
