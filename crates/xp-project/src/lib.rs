//! xp-project: session and phase-definition documents, validation and the file loader.

pub mod convert;
pub mod loader;
pub mod schema;
pub mod session;
pub mod validate;

pub use loader::{DocumentLoader, load_phase_doc, save_phase_doc};
pub use schema::*;
pub use session::{SessionView, build_store};
pub use validate::{LATEST_VERSION, ValidationError, validate_phase_doc, validate_session};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Phase error: {0}")]
    Phase(#[from] xp_phases::PhaseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<Session> {
    let content = std::fs::read_to_string(path)?;
    let session: Session = serde_yaml::from_str(&content)?;
    validate_session(&session)?;
    Ok(session)
}

pub fn save_yaml(path: &Path, session: &Session) -> ProjectResult<()> {
    validate_session(session)?;
    let content = serde_yaml::to_string(session)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Session> {
    let content = std::fs::read_to_string(path)?;
    let session: Session = serde_json::from_str(&content)?;
    validate_session(&session)?;
    Ok(session)
}

pub fn save_json(path: &Path, session: &Session) -> ProjectResult<()> {
    validate_session(session)?;
    let content = serde_json::to_string_pretty(session)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a session by extension: `.json` as JSON, anything else as YAML.
pub fn load_session(path: &Path) -> ProjectResult<Session> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
