//! # Error Types
//!
//! All failures of the playback pipeline share one error enum so callers can
//! match on the kind and build a meaningful message.
//!
//! - `ParseError` - malformed MusicXML; fatal, compilation aborts with no
//!   partial output. Carries the byte offset the reader had reached.
//! - `NotReady` - playback was requested before the instrument backend
//!   finished loading its samples; recoverable, retry once the backend
//!   signals readiness.
//! - `InvalidArgument` - the scheduler was asked to operate on inconsistent
//!   input, e.g. a non-positive tempo.
//!
//! A score with zero extractable events is *not* an error: it compiles to an
//! empty event list and plays back as a no-op. Missing optional fields
//! (`divisions`, `tempo`, `alter`) fall back to documented defaults instead
//! of failing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolfaError {
    /// Malformed MusicXML.
    ///
    /// # Example
    /// ```
    /// # use solfa::SolfaError;
    /// let err = SolfaError::ParseError {
    ///     offset: 12,
    ///     message: "ill-formed document: expected `</note>`, found `</pitch>`".to_string(),
    /// };
    /// assert!(err.to_string().starts_with("Parse error at byte 12"));
    /// ```
    #[error("Parse error at byte {offset}: {message}")]
    ParseError { offset: usize, message: String },

    /// The instrument backend has not finished loading its sample set.
    #[error("Instrument backend is not ready")]
    NotReady,

    /// The scheduler was given inconsistent input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
