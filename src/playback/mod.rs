//! # Playback Module
//!
//! Compile the raw structural note stream into the flat, time-ordered event
//! sequence the scheduler plays back.
//!
//! ## Sub-modules
//! - `types` - [`PlaybackData`] / [`PlaybackNote`] definitions
//! - `engine` - the divisions-to-beats compilation pass
//!
//! ## Entry Point
//! [`generate_playback_data()`] - convert a MusicXML string to playback data
//!
//! ## Timeline model
//! Events are produced in document order with a running beat clock, so start
//! times are non-decreasing and `time[i+1] == time[i] + duration[i]` for a
//! single-voice score. All `<note>` elements are treated as one sequential
//! stream: chords and multi-voice parts would serialize instead of overlap.

mod engine;
mod types;


pub use engine::{compile_events, generate_playback_data};
pub use types::{PlaybackData, PlaybackNote};
