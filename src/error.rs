//! Error types for the OB engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the schedule and pay engine can report.

use chrono::NaiveDateTime;
use thiserror::Error;

/// The main error type for the OB engine.
///
/// Configuration-class errors ([`EngineError::Configuration`],
/// [`EngineError::OverlapAmbiguity`]) abort a whole calculation. Input errors
/// ([`EngineError::InputRange`]) are reported per call and leave cached
/// results for other keys untouched.
///
/// # Example
///
/// ```
/// use ob_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/settings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/settings.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The loaded configuration is inconsistent (undefined shift code,
    /// undefined priority tier, holiday outside its year, ...).
    #[error("Configuration error: {message}")]
    Configuration {
        /// A description of the inconsistency.
        message: String,
    },

    /// Two rules of the same priority both match the same minutes.
    #[error(
        "Ambiguous rules: '{first}' and '{second}' share priority {priority} and both match at {at}"
    )]
    OverlapAmbiguity {
        /// Code of the first rule.
        first: String,
        /// Code of the second rule.
        second: String,
        /// The shared priority.
        priority: u8,
        /// First minute matched by both rules.
        at: NaiveDateTime,
    },

    /// The requested range or identifier is not usable.
    #[error("Invalid input: {message}")]
    InputRange {
        /// A description of what was wrong with the input.
        message: String,
    },

    /// The principal may not view the requested wage data.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why access was denied.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Configuration`] error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::InputRange`] error.
    pub fn input_range(message: impl Into<String>) -> Self {
        Self::InputRange {
            message: message.into(),
        }
    }

    /// Returns true for errors that invalidate the whole calculation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParse { .. }
                | Self::Configuration { .. }
                | Self::OverlapAmbiguity { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
