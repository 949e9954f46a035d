use std::fmt;

#[derive(Debug)]
pub enum SpatialError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Projection centre out of range.
    ConfigValidation(String),
}

impl fmt::Display for SpatialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for SpatialError {}
