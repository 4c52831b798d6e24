//! Session and phase-definition document schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A saved overlay session: conditions, view and the phases to load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub version: u32,
    pub name: String,
    #[serde(default = "default_true")]
    pub same_conditions: bool,
    #[serde(default)]
    pub conditions: ConditionsDef,
    #[serde(default)]
    pub view: ViewDef,
    #[serde(default)]
    pub phases: Vec<PhaseRefDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConditionsDef {
    #[serde(default)]
    pub pressure_gpa: f64,
    #[serde(default = "default_temperature_k")]
    pub temperature_k: f64,
}

impl Default for ConditionsDef {
    fn default() -> Self {
        Self {
            pressure_gpa: 0.0,
            temperature_k: default_temperature_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewDef {
    /// `d`, `E` or `Q`.
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_two_theta_deg")]
    pub two_theta_deg: f64,
    #[serde(default = "default_x_range")]
    pub x_range: [f64; 2],
    #[serde(default = "default_y_range")]
    pub y_range: [f64; 2],
}

impl Default for ViewDef {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            two_theta_deg: default_two_theta_deg(),
            x_range: default_x_range(),
            y_range: default_y_range(),
        }
    }
}

/// One phase of a session plus its display state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseRefDef {
    #[serde(flatten)]
    pub source: PhaseSourceDef,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Overrides the session conditions for this phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ConditionsDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum PhaseSourceDef {
    /// Phase-definition document on disk; relative paths resolve against the session file.
    Definition { path: PathBuf },
    /// Structure-derived reflection list, filtered by the two conversion thresholds.
    Structure {
        path: PathBuf,
        #[serde(default = "default_threshold")]
        intensity_cutoff: f64,
        #[serde(default = "default_threshold")]
        minimum_d_spacing: f64,
    },
    /// Definition embedded in the session itself.
    Inline { phase: PhaseDoc },
}

/// Phase-definition document: EOS, optional cell and the zero-pressure reflection list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseDoc {
    pub name: String,
    pub eos: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellDef>,
    #[serde(default)]
    pub reflections: Vec<ReflectionDef>,
}

/// Lattice constants; omitted lengths and angles follow from the symmetry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellDef {
    pub symmetry: String,
    pub a: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReflectionDef {
    #[serde(default)]
    pub h: i32,
    #[serde(default)]
    pub k: i32,
    #[serde(default)]
    pub l: i32,
    #[serde(default)]
    pub d0: f64,
    pub intensity: f64,
}

fn default_true() -> bool {
    true
}

fn default_temperature_k() -> f64 {
    300.0
}

fn default_unit() -> String {
    "E".to_string()
}

fn default_two_theta_deg() -> f64 {
    15.0
}

fn default_x_range() -> [f64; 2] {
    [0.0, 100.0]
}

fn default_y_range() -> [f64; 2] {
    [0.0, 100.0]
}

fn default_threshold() -> f64 {
    0.5
}
