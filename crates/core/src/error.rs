//! Core error type.
//!
//! `HealthError` covers configuration and programming mistakes (unknown names, malformed
//! schemas, operations issued in the wrong session state). User input that fails a constraint is
//! never a `HealthError`: it is reported as a value on the field state.

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field declared twice: {0}")]
    DuplicateField(String),
    #[error("field {child} already has parent {existing}; cannot also depend on {parent}")]
    MultipleParents {
        child: String,
        existing: String,
        parent: String,
    },
    #[error("dependency cycle through field {0}")]
    DependencyCycle(String),
    #[error("options for {field} are keyed by unknown parent value '{key}'")]
    UnknownParentKey { field: String, key: String },
    #[error("default value for {field} does not match its kind")]
    DefaultKindMismatch { field: String },
    #[error("invalid pattern for {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown region: {0}")]
    UnknownRegion(String),
    #[error("region declared twice: {0}")]
    DuplicateRegion(String),
    #[error("region {region} has invalid layout: {reason}")]
    InvalidRegionLayout { region: String, reason: String },
    #[error("tag '{tag}' is not offered for region {region}")]
    TagNotOffered { region: String, tag: String },
    #[error("no region is being edited")]
    NoActiveSession,

    #[error("unknown record: {0}")]
    UnknownRecord(String),

    #[error("invalid configuration at {path}: {message}")]
    ConfigSchema { path: String, message: String },
    #[error("failed to read configuration file: {0}")]
    ConfigRead(std::io::Error),
}

pub type HealthResult<T> = std::result::Result<T, HealthError>;
