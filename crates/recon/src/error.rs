use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no strategies, duplicate strategy, etc.).
    ConfigValidation(String),
    /// A normalization pattern failed to compile (bad class token).
    Pattern(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Pattern(msg) => write!(f, "normalization pattern error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
