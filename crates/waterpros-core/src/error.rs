use std::path::PathBuf;

use thiserror::Error;

/// Whole-file failures reading the catalog or a local data table.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("data file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected a top-level JSON {expected}")]
    Shape { expected: &'static str },
}

/// Why a single catalog row was skipped at load time.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("schema mismatch: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("duplicate combination {city_slug}/{service_slug}")]
    Duplicate {
        city_slug: String,
        service_slug: String,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Submission problems reported back to the person filling in the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeadError {
    #[error("Missing required fields: name, phone, service, and city are required (missing `{0}`)")]
    MissingField(&'static str),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid phone number format")]
    InvalidPhone,
}

/// Failures of the persistence collaborator. Never shown to the submitter.
#[derive(Debug, Error)]
pub enum LeadStoreError {
    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}
