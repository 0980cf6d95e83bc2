//! Shared error types.

use thiserror::Error;

use crate::session::Phase;

/// Errors emitted by `SessionController` commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("`{command}` is not allowed while {phase}")]
    InvalidState { command: &'static str, phase: Phase },
}

/// Failures reported by a `ClassifierPort`. Never fatal: the round is
/// scored as incorrect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ClassifierError {
    #[error("classifier model is not loaded")]
    Unavailable,
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Errors emitted while loading a `GameConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid game config: {0}")]
    Invalid(&'static str),
    #[cfg(feature = "serde_json")]
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}
