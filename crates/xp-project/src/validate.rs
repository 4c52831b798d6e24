//! Session and phase-document validation.

use crate::schema::{ConditionsDef, PhaseDoc, PhaseSourceDef, Session, ViewDef};
use xp_eos::describe;
use xp_phases::PositionUnit;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown equation of state '{id}' in phase '{phase}'")]
    UnknownEos { id: String, phase: String },

    #[error("Invalid phase '{phase}': {reason}")]
    InvalidPhase { phase: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_session(session: &Session) -> Result<(), ValidationError> {
    if session.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: session.version,
        });
    }

    validate_conditions("conditions", &session.conditions)?;
    validate_view(&session.view)?;

    for (i, phase) in session.phases.iter().enumerate() {
        if let Some(conditions) = &phase.conditions {
            validate_conditions(&format!("phases[{i}].conditions"), conditions)?;
        }
        match &phase.source {
            PhaseSourceDef::Definition { path } => {
                if path.as_os_str().is_empty() {
                    return Err(invalid(format!("phases[{i}].path"), "", "empty path"));
                }
            }
            PhaseSourceDef::Structure {
                path,
                intensity_cutoff,
                minimum_d_spacing,
            } => {
                if path.as_os_str().is_empty() {
                    return Err(invalid(format!("phases[{i}].path"), "", "empty path"));
                }
                if !(0.0..=100.0).contains(intensity_cutoff) {
                    return Err(invalid(
                        format!("phases[{i}].intensity_cutoff"),
                        intensity_cutoff,
                        "must be a percentage in [0, 100]",
                    ));
                }
                if !(minimum_d_spacing.is_finite() && *minimum_d_spacing >= 0.0) {
                    return Err(invalid(
                        format!("phases[{i}].minimum_d_spacing"),
                        minimum_d_spacing,
                        "must be non-negative",
                    ));
                }
            }
            PhaseSourceDef::Inline { phase } => validate_phase_doc(phase)?,
        }
    }

    Ok(())
}

fn validate_conditions(field: &str, conditions: &ConditionsDef) -> Result<(), ValidationError> {
    if !conditions.pressure_gpa.is_finite() {
        return Err(invalid(
            format!("{field}.pressure_gpa"),
            conditions.pressure_gpa,
            "must be finite",
        ));
    }
    if !(conditions.temperature_k.is_finite() && conditions.temperature_k > 0.0) {
        return Err(invalid(
            format!("{field}.temperature_k"),
            conditions.temperature_k,
            "must be positive",
        ));
    }
    Ok(())
}

fn validate_view(view: &ViewDef) -> Result<(), ValidationError> {
    if view.unit.parse::<PositionUnit>().is_err() {
        return Err(invalid("view.unit", &view.unit, "expected d, E or Q"));
    }
    if !(view.two_theta_deg > 0.0 && view.two_theta_deg < 180.0) {
        return Err(invalid(
            "view.two_theta_deg",
            view.two_theta_deg,
            "must lie in (0, 180)",
        ));
    }
    for (field, [lo, hi]) in [("view.x_range", view.x_range), ("view.y_range", view.y_range)] {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(invalid(field, format!("[{lo}, {hi}]"), "expected finite min < max"));
        }
    }
    Ok(())
}

/// Checks a phase document can be turned into a phase.
pub fn validate_phase_doc(doc: &PhaseDoc) -> Result<(), ValidationError> {
    if describe(&doc.eos).is_err() {
        return Err(ValidationError::UnknownEos {
            id: doc.eos.clone(),
            phase: doc.name.clone(),
        });
    }
    doc.to_definition()
        .map_err(|fault| ValidationError::InvalidPhase {
            phase: doc.name.clone(),
            reason: fault.to_string(),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PhaseRefDef;

    fn session() -> Session {
        Session {
            version: 1,
            name: "s".into(),
            same_conditions: true,
            conditions: ConditionsDef::default(),
            view: ViewDef::default(),
            phases: vec![],
        }
    }

    #[test]
    fn defaults_are_valid() {
        validate_session(&session()).unwrap();
    }

    #[test]
    fn future_version_rejected() {
        let mut s = session();
        s.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_session(&s),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn view_checks() {
        let mut s = session();
        s.view.unit = "2theta".into();
        assert!(validate_session(&s).is_err());

        let mut s = session();
        s.view.x_range = [10.0, 5.0];
        assert!(validate_session(&s).is_err());
    }

    #[test]
    fn inline_phase_with_unknown_eos() {
        let mut s = session();
        s.phases.push(PhaseRefDef {
            source: PhaseSourceDef::Inline {
                phase: PhaseDoc {
                    name: "x".into(),
                    eos: "vinet".into(),
                    parameters: Default::default(),
                    cell: None,
                    reflections: vec![],
                },
            },
            visible: true,
            conditions: None,
        });
        assert!(matches!(
            validate_session(&s),
            Err(ValidationError::UnknownEos { .. })
        ));
    }
}
