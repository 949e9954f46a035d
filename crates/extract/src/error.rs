use std::fmt;

#[derive(Debug)]
pub enum ExtractError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty region list, zero threshold, etc.).
    ConfigValidation(String),
    /// A detection pattern failed to compile.
    Pattern { rule: &'static str, message: String },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "extract config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "extract config validation error: {msg}"),
            Self::Pattern { rule, message } => {
                write!(f, "rule '{rule}': invalid pattern: {message}")
            }
        }
    }
}

impl std::error::Error for ExtractError {}
