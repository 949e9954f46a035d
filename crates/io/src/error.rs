use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// Source or destination could not be opened.
    Open { path: PathBuf, source: std::io::Error },
    /// Malformed content. `line` is 1-based when known.
    Parse { path: PathBuf, line: Option<u64>, message: String },
    /// A feature carries an unsupported or invalid geometry.
    Geometry { path: PathBuf, feature: usize, message: String },
    /// Output could not be written.
    Write { path: PathBuf, message: String },
    /// Invalid attribute mapping.
    Config(String),
}

impl IoError {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Open { path, .. }
            | Self::Parse { path, .. }
            | Self::Geometry { path, .. }
            | Self::Write { path, .. } => Some(path),
            Self::Config(_) => None,
        }
    }

    /// Whether the error concerns an input source rather than output.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Parse { .. } | Self::Geometry { .. })
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => write!(f, "cannot open {}: {source}", path.display()),
            Self::Parse { path, line: Some(line), message } => {
                write!(f, "{}:{line}: {message}", path.display())
            }
            Self::Parse { path, line: None, message } => write!(f, "{}: {message}", path.display()),
            Self::Geometry { path, feature, message } => {
                write!(f, "{}: feature {feature}: {message}", path.display())
            }
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
            Self::Config(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            _ => None,
        }
    }
}
