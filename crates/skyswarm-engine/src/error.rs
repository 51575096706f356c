//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: skyswarm_core::config::ConfigError,
    },

    /// The flocking parameters were rejected at engine construction.
    #[error("invalid parameters: {source}")]
    Params {
        /// The underlying validation error.
        #[from]
        source: skyswarm_core::config::ParamsError,
    },

    /// A background task panicked or was cancelled.
    #[error("background task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
