//! Playback data generation engine.
//!
//! Converts the structural note stream into a flat, time-ordered sequence
//! of performance events with correct divisions-to-beats conversion.

use tracing::{debug, warn};

use super::types::{PlaybackData, PlaybackNote};
use crate::error::SolfaError;
use crate::musicxml::{read_score, ScoreDocument};
use crate::pitch::pitch_name;

/// Generate playback data from a MusicXML document.
///
/// This is the whole pipeline short of scheduling: read the structural
/// fields, then compile them into timed events.
///
/// # Example
/// ```rust
/// use solfa::generate_playback_data;
///
/// let xml = r#"<score-partwise><part><measure>
///     <attributes><divisions>4</divisions></attributes>
///     <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>
/// </measure></part></score-partwise>"#;
///
/// let data = generate_playback_data(xml)?;
/// assert_eq!(data.tempo, 120.0); // default
/// assert_eq!(data.notes[0].note, "C4");
/// assert_eq!(data.notes[0].duration, 1.0); // 4 ticks / 4 divisions
/// # Ok::<(), solfa::SolfaError>(())
/// ```
///
/// # Errors
/// Returns [`SolfaError::ParseError`] for malformed XML. A score with no
/// notes is not an error; it compiles to an empty event list.
pub fn generate_playback_data(xml: &str) -> Result<PlaybackData, SolfaError> {
    let document = read_score(xml)?;
    Ok(compile_events(&document))
}

/// Compile a structural document into the ordered event sequence.
///
/// Maintains a running beat clock: every note - pitched, rest, or
/// pitchless - advances it by `duration_ticks / divisions`, but only
/// pitched non-rest notes emit an event. The result is a strictly
/// sequential, monophonic timeline.
pub fn compile_events(document: &ScoreDocument) -> PlaybackData {
    let mut notes = Vec::new();
    let mut current_time = 0.0;

    for raw in &document.notes {
        let duration_beats =
            f64::from(raw.duration_ticks) / f64::from(document.divisions);

        if !raw.is_rest {
            if let Some(pitch) = &raw.pitch {
                let name = pitch_name(pitch.step, pitch.alter, pitch.octave);
                debug!(
                    note = %name,
                    time = current_time,
                    duration = duration_beats,
                    "compiled note event"
                );
                notes.push(PlaybackNote {
                    note: name,
                    time: current_time,
                    duration: duration_beats,
                });
            } else {
                warn!(time = current_time, "skipping non-rest note without pitch");
            }
        }

        current_time += duration_beats;
    }

    debug!(
        events = notes.len(),
        tempo = document.tempo,
        "playback data compiled"
    );

    PlaybackData {
        notes,
        tempo: document.tempo,
    }
}
