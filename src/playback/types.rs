//! Playback data type definitions.
//!
//! These types cross the UI boundary as plain serialized data, so they
//! derive `Serialize` with camelCase field names.

use serde::Serialize;

/// A single schedulable note event.
///
/// `time` and `duration` are in beats (quarter notes by MusicXML
/// convention); the scheduler converts them to seconds against the session
/// tempo. Rests never appear here - they only advance the beat clock during
/// compilation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackNote {
    /// Canonical pitch name, e.g. `"C#4"` or `"Bb3"`.
    pub note: String,
    /// Start position in beats from the beginning of the score.
    pub time: f64,
    /// Length in beats. Zero-length events (grace notes) are preserved.
    pub duration: f64,
}

/// Playback data for an entire score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackData {
    /// All note events, in non-decreasing `time` order.
    pub notes: Vec<PlaybackNote>,
    /// Beats per minute as notated, or the 120 default.
    pub tempo: f64,
}
