//! Unified error hierarchy for runbeat
//!
//! Separates caller mistakes (validation), failed data-source fetches
//! (upstream), and numeric faults inside the segmentation engine
//! (computation). The core never retries and never logs; every error is
//! surfaced to the caller and no partial segment list is ever returned.

use thiserror::Error;

/// Top-level error type for all runbeat operations
#[derive(Debug, Error)]
pub enum RunbeatError {
    /// Caller supplied malformed or missing required fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Numeric fault during segmentation
    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    /// The activity data source failed to return data
    #[error("Upstream error from {source_name}: {reason}")]
    Upstream { source_name: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Numeric faults the segmentation engine guards against explicitly, rather
/// than letting NaN or infinity leak into returned segments
#[derive(Debug, Error)]
pub enum ComputationError {
    /// A segment resolved to zero or negative distance
    #[error("Division by zero in {calculation}")]
    DivisionByZero { calculation: String },

    /// A required stream carried no samples
    #[error("Empty stream: {stream}")]
    EmptyStream { stream: String },

    /// Streams of one activity disagree on sample count
    #[error("Mismatched stream lengths: {stream} has {actual} samples, expected {expected}")]
    MismatchedStreams {
        stream: String,
        expected: usize,
        actual: usize,
    },

    /// A derived sample index fell outside the stream
    #[error("Index {index} out of range for stream of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid parameter for a calculation
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: String,
    },
}

/// Result type alias for runbeat operations
pub type Result<T> = std::result::Result<T, RunbeatError>;

impl RunbeatError {
    /// Whether retrying the operation could help. Only upstream fetches and
    /// IO qualify; validation and computation errors are deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RunbeatError::Upstream { .. } | RunbeatError::Io(_))
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RunbeatError::Validation(_) => ErrorSeverity::Warning,
            RunbeatError::Computation(_) => ErrorSeverity::Error,
            RunbeatError::Upstream { .. } => ErrorSeverity::Error,
            RunbeatError::Configuration(_) => ErrorSeverity::Error,
            RunbeatError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RunbeatError::Validation(reason) => {
                format!("Invalid request: {}", reason)
            }
            RunbeatError::Upstream { source_name, .. } => {
                format!(
                    "Could not fetch activity data from {}. Please try again.",
                    source_name
                )
            }
            RunbeatError::Computation(ComputationError::MismatchedStreams { stream, .. }) => {
                format!(
                    "The activity's {} stream is inconsistent with the other streams.",
                    stream
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Critical,
    Error,
    Warning,
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
