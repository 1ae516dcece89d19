//! # Solfa
//!
//! MusicXML playback core for the Solfa practice app: parse a MusicXML
//! document into an ordered, time-stamped sequence of note events, then
//! schedule those events against a transport clock for accurate, cancelable
//! playback synchronized with a visual cursor.
//!
//! ## Pipeline
//! 1. [`musicxml::read_score`] - structural walk of the document (pitches,
//!    durations, rests, divisions, tempo hint)
//! 2. [`generate_playback_data`] - divisions-to-beats conversion into a
//!    flat, time-ordered event list
//! 3. [`Scheduler`] - beats-to-seconds scheduling against the caller's
//!    instrument backend and optional cursor
//!
//! Score rendering, audio I/O and all persistence live outside this crate;
//! the seams are the [`Instrument`] and [`CursorFollower`] traits.
//!
//! ## Example
//! ```rust
//! use solfa::generate_playback_data;
//!
//! let xml = r#"<score-partwise><part><measure>
//!     <attributes><divisions>1</divisions></attributes>
//!     <direction><sound tempo="90"/></direction>
//!     <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
//!     <note><pitch><step>E</step><alter>-1</alter><octave>4</octave></pitch><duration>1</duration></note>
//! </measure></part></score-partwise>"#;
//!
//! let data = generate_playback_data(xml)?;
//! assert_eq!(data.tempo, 90.0);
//! assert_eq!(data.notes[1].note, "Eb4");
//! assert_eq!(data.notes[1].time, 1.0);
//! # Ok::<(), solfa::SolfaError>(())
//! ```

pub mod error;
pub mod musicxml;
pub mod pitch;
pub mod playback;
pub mod scheduler;

pub use error::SolfaError;
pub use musicxml::{read_score, RawNote, RawPitch, ScoreDocument};
pub use pitch::{normalize_for_playback, pitch_name};
pub use playback::{generate_playback_data, PlaybackData, PlaybackNote};
pub use scheduler::{
    BackendReadiness, CursorFollower, Instrument, PlaybackState, Scheduler,
};
