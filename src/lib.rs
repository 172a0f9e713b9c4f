// Library interface for the runbeat modules
// This allows integration tests to access the core functionality

pub mod analysis;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod plan;
pub mod playlist;
pub mod style;

// Re-export commonly used types for convenience
pub use analysis::ActivityAnalyzer;
pub use config::{AppConfig, DataSourceConfig};
pub use error::{ComputationError, Result, RunbeatError};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use plan::PlanSynthesizer;
pub use playlist::{clip_requests, ClipRequest};
pub use style::determine_music_style;
