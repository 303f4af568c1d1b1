// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Errors

use std::path::PathBuf;

use crate::types::Role;

/// Errors raised while loading inputs or running a match.
///
/// Load-time variants abort before the first step. `PreconditionViolated` is an
/// internal-consistency failure of the model or engine and is never recovered.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("technique catalog `{path}` could not be read: {source}")]
    CatalogUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("technique catalog is malformed: {0}")]
    CatalogFormat(#[source] csv::Error),

    #[error("technique catalog has no `{0}` column")]
    CatalogColumn(&'static str),

    #[error("fighter profile file `{path}` could not be read: {source}")]
    ProfilesUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fighter profile is not valid JSON: {0}")]
    ProfilesFormat(#[from] serde_json::Error),

    #[error("fighter profile is missing required role `{0}`")]
    MissingRole(Role),

    #[error("match config `{path}` could not be read: {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("match config is invalid: {0}")]
    ConfigFormat(#[from] toml::de::Error),

    #[error("unknown place `{0}`")]
    UnknownPlace(String),

    #[error(
        "transition `{transition}` fired without its preconditions: \
         fighter {role} expected at `{expected}`, found at `{actual}`"
    )]
    PreconditionViolated {
        transition: String,
        role: Role,
        expected: String,
        actual: String,
    },

    #[error("event log could not be written or parsed: {0}")]
    EventLog(#[source] csv::Error),

    #[error("net export could not be serialized: {0}")]
    Export(#[source] serde_json::Error),

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
