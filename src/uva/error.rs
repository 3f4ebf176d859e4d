use std::{error::Error as StdError, fmt, io, path::PathBuf, result::Result as StdResult};

/// Everything that aborts an operation. Verification verdicts (wrong
/// answer, compile error, ...) are ordinary results, not errors.
#[derive(Debug)]
pub enum Error {
    Network(reqwest::Error),
    Malformed(&'static str),
    Io(io::Error),
    Corrupt { path: PathBuf, source: bincode::Error },
    ProblemNotFound(u32),
    UnsupportedLanguage(String),
    InvalidArgument(String),
    Judge(String),
    NotLoggedIn,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "Network error: {}", e),
            Self::Malformed(what) => {
                write!(f, "Unexpected page structure ({}), scraper is stale", what)
            }
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Corrupt { path, source } => {
                write!(f, "Corrupt data file {}: {}", path.display(), source)
            }
            Self::ProblemNotFound(id) => write!(f, "Problem {} not found in problem list", id),
            Self::UnsupportedLanguage(ext) => write!(f, "Unsupported source extension .{}", ext),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::Judge(msg) => write!(f, "Judge: {}", msg),
            Self::NotLoggedIn => write!(f, "You are not logged in yet"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Corrupt { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e)
    }
}
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = StdResult<T, Error>;
