//! Errors surfaced by the balancer and the session store.

/// Errors that can occur while balancing or persisting sessions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TeamsError {
    /// Bad team count or malformed player / team data. Never retried.
    InvalidArgument(String),
    /// No session with this slug.
    NotFound { slug: String },
    /// The underlying store failed; the caller may retry with backoff.
    StoreUnavailable(String),
    /// The session belongs to a past day; its teams can no longer change.
    HistoryLocked { slug: String },
    /// A checked write saw a different revision than expected.
    Conflict { expected: u64, actual: u64 },
}

impl TeamsError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TeamsError::InvalidArgument(message.into())
    }

    pub fn not_found(slug: impl Into<String>) -> Self {
        TeamsError::NotFound { slug: slug.into() }
    }

    /// Only transient store failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TeamsError::StoreUnavailable(_))
    }
}

impl std::fmt::Display for TeamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamsError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            TeamsError::NotFound { .. } => write!(f, "Session not found"),
            TeamsError::StoreUnavailable(msg) => write!(f, "Session store unavailable: {}", msg),
            TeamsError::HistoryLocked { .. } => {
                write!(f, "Session is history; only paid status can change")
            }
            TeamsError::Conflict { expected, actual } => write!(
                f,
                "Session was modified concurrently (expected revision {}, found {})",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for TeamsError {}

impl From<std::io::Error> for TeamsError {
    fn from(err: std::io::Error) -> Self {
        TeamsError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for TeamsError {
    fn from(err: serde_json::Error) -> Self {
        TeamsError::StoreUnavailable(err.to_string())
    }
}
