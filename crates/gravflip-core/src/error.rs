//! Error types for gravflip

use thiserror::Error;

/// The main error type for gravflip operations
#[derive(Debug, Error)]
pub enum GravflipError {
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(String),

    #[error("Degenerate gravity direction: [{x}, {y}, {z}]")]
    DegenerateGravity { x: f32, y: f32, z: f32 },

    #[error("Probe error: {0}")]
    ProbeError(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid curve: {0}")]
    InvalidCurve(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for gravflip operations
pub type Result<T> = std::result::Result<T, GravflipError>;

impl GravflipError {
    /// Build a range error for a scalar config field
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        GravflipError::ValueOutOfRange {
            field: field.into(),
            min,
            max,
            value,
        }
    }
}

impl From<toml::de::Error> for GravflipError {
    fn from(err: toml::de::Error) -> Self {
        GravflipError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for GravflipError {
    fn from(err: toml::ser::Error) -> Self {
        GravflipError::TomlSerError(err.to_string())
    }
}
