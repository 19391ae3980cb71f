use thiserror::Error;

/// Errors the engine can surface to callers.
///
/// Only a truly unreadable document aborts a parse. Heuristic misses are
/// data (`Unparsed` ranges, `Unknown` statuses, `None` metadata), never
/// errors, so partial extraction from a damaged report stays useful.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unreadable PDF: {0}")]
    UnreadablePdf(String),

    #[error("unknown vendor profile: {0}")]
    UnknownProfile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile file is not valid JSON: {0}")]
    ProfileFormat(#[from] serde_json::Error),
}
