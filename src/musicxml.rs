//! # MusicXML Structural Reader
//!
//! Walks a MusicXML document and yields the raw per-note structural fields
//! the playback engine needs: pitch step/alter/octave, duration in ticks,
//! the rest flag, plus the document-wide `divisions` and tempo hint. It has
//! no knowledge of time or audio; converting ticks to beats is the playback
//! engine's job.
//!
//! ## Reading rules
//! - `divisions`: the first `<divisions>` value found anywhere in the
//!   document wins; later occurrences are ignored (mid-piece divisions
//!   changes are not modeled). Defaults to 1.
//! - `tempo`: the `tempo` attribute of the first `<sound>` element that
//!   carries one. Defaults to 120.
//! - One [`RawNote`] per `<note>` element, in document order, regardless of
//!   measure or part (single-voice assumption; `<backup>` is not handled,
//!   so multi-voice scores serialize instead of overlapping).
//! - `<duration>` is only read inside a `<note>`, never from
//!   `<backup>`/`<forward>`.
//!
//! Only malformed XML is fatal. Unparseable numeric text falls back to the
//! field default (`alter` 0, `octave` 4, `duration` 0, `divisions` 1), the
//! same tolerance the rest of the app shows for hand-edited scores.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::SolfaError;

/// Ticks per quarter note when the document does not declare `<divisions>`.
pub const DEFAULT_DIVISIONS: u32 = 1;

/// Beats per minute when no `<sound tempo="...">` is present.
pub const DEFAULT_TEMPO: f64 = 120.0;

/// Octave used when `<octave>` text is missing or unparseable.
const DEFAULT_OCTAVE: i32 = 4;

/// Pitch fields of one `<pitch>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPitch {
    pub step: char,
    pub alter: i8,
    pub octave: i32,
}

/// Structural fields of one `<note>` element.
///
/// A note with a `<duration>` of 0 (grace notes, truncated documents) is
/// kept as-is: it compiles to a zero-length event and does not advance the
/// timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNote {
    pub is_rest: bool,
    pub duration_ticks: u32,
    /// `None` for rests and for non-rest notes with no usable `<pitch>`
    /// child; the latter compile to no event but still advance time.
    pub pitch: Option<RawPitch>,
}

/// Everything the reader extracts from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDocument {
    pub divisions: u32,
    pub tempo: f64,
    pub notes: Vec<RawNote>,
}

/// Leaf element whose text content is currently being collected.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TextTarget {
    Divisions,
    Duration,
    Step,
    Alter,
    Octave,
}

/// Accumulates the children of the `<note>` currently being read.
#[derive(Default)]
struct NoteBuilder {
    is_rest: bool,
    duration_ticks: u32,
    step: Option<char>,
    alter: i8,
    octave: Option<i32>,
}

impl NoteBuilder {
    fn finish(self) -> RawNote {
        let pitch = self.step.map(|step| RawPitch {
            step,
            alter: self.alter,
            octave: self.octave.unwrap_or(DEFAULT_OCTAVE),
        });
        RawNote {
            is_rest: self.is_rest,
            duration_ticks: self.duration_ticks,
            pitch,
        }
    }
}

/// Read a MusicXML document into its structural parts.
///
/// Consumes the document wholesale; a well-formedness error from the XML
/// layer aborts the read with [`SolfaError::ParseError`] and no partial
/// result.
pub fn read_score(xml: &str) -> Result<ScoreDocument, SolfaError> {
    let mut reader = Reader::from_str(xml);

    let mut divisions: Option<u32> = None;
    let mut tempo: Option<f64> = None;
    let mut notes: Vec<RawNote> = Vec::new();

    let mut current: Option<NoteBuilder> = None;
    let mut in_pitch = false;
    let mut text_target: Option<TextTarget> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                text_target = None;
                match e.local_name().as_ref() {
                    b"note" => current = Some(NoteBuilder::default()),
                    b"rest" => {
                        if let Some(note) = current.as_mut() {
                            note.is_rest = true;
                        }
                    }
                    b"pitch" if current.is_some() => in_pitch = true,
                    b"duration" if current.is_some() => {
                        text_target = Some(TextTarget::Duration)
                    }
                    b"step" if in_pitch => text_target = Some(TextTarget::Step),
                    b"alter" if in_pitch => text_target = Some(TextTarget::Alter),
                    b"octave" if in_pitch => text_target = Some(TextTarget::Octave),
                    b"divisions" if divisions.is_none() => {
                        text_target = Some(TextTarget::Divisions)
                    }
                    b"sound" => {
                        if tempo.is_none() {
                            tempo = read_sound_tempo(&e);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"rest" => {
                    if let Some(note) = current.as_mut() {
                        note.is_rest = true;
                    }
                }
                b"sound" => {
                    if tempo.is_none() {
                        tempo = read_sound_tempo(&e);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Some(target) = text_target {
                    let text = t
                        .unescape()
                        .map_err(|e| parse_error(&reader, &e))?;
                    let text = text.trim();
                    match target {
                        TextTarget::Divisions => {
                            divisions =
                                Some(text.parse().unwrap_or(DEFAULT_DIVISIONS).max(1));
                        }
                        TextTarget::Duration => {
                            if let Some(note) = current.as_mut() {
                                note.duration_ticks = text.parse().unwrap_or(0);
                            }
                        }
                        TextTarget::Step => {
                            if let Some(note) = current.as_mut() {
                                note.step = text.chars().next();
                            }
                        }
                        TextTarget::Alter => {
                            if let Some(note) = current.as_mut() {
                                note.alter = text.parse().unwrap_or(0);
                            }
                        }
                        TextTarget::Octave => {
                            if let Some(note) = current.as_mut() {
                                note.octave = text.parse().ok();
                            }
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                text_target = None;
                match e.local_name().as_ref() {
                    b"note" => {
                        in_pitch = false;
                        if let Some(builder) = current.take() {
                            notes.push(builder.finish());
                        }
                    }
                    b"pitch" => in_pitch = false,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(&reader, &e)),
            Ok(_) => {}
        }
    }

    Ok(ScoreDocument {
        divisions: divisions.unwrap_or(DEFAULT_DIVISIONS),
        tempo: tempo.unwrap_or(DEFAULT_TEMPO),
        notes,
    })
}

/// Tempo attribute of a `<sound>` element, if it carries one.
///
/// An unparseable value still counts as "this element has the attribute":
/// it resolves to the default rather than letting a later `<sound>` win.
fn read_sound_tempo(e: &BytesStart) -> Option<f64> {
    for attr in e.attributes().with_checks(false).flatten() {
        if attr.key.local_name().as_ref() == b"tempo" {
            let raw = String::from_utf8_lossy(&attr.value);
            return Some(raw.trim().parse().unwrap_or(DEFAULT_TEMPO));
        }
    }
    None
}

fn parse_error(reader: &Reader<&[u8]>, err: &quick_xml::Error) -> SolfaError {
    SolfaError::ParseError {
        offset: reader.buffer_position(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_single_note() {
        let xml = r#"<score-partwise><part id="P1"><measure number="1">
            <attributes><divisions>4</divisions></attributes>
            <note>
                <pitch><step>C</step><alter>1</alter><octave>4</octave></pitch>
                <duration>4</duration>
            </note>
        </measure></part></score-partwise>"#;

        let doc = read_score(xml).unwrap();
        assert_eq!(doc.divisions, 4);
        assert_eq!(doc.notes.len(), 1);
        assert_eq!(
            doc.notes[0],
            RawNote {
                is_rest: false,
                duration_ticks: 4,
                pitch: Some(RawPitch {
                    step: 'C',
                    alter: 1,
                    octave: 4
                }),
            }
        );
    }

    #[test]
    fn test_defaults_when_fields_absent() {
        let xml = "<score-partwise><part><measure></measure></part></score-partwise>";
        let doc = read_score(xml).unwrap();
        assert_eq!(doc.divisions, DEFAULT_DIVISIONS);
        assert_eq!(doc.tempo, DEFAULT_TEMPO);
        assert!(doc.notes.is_empty());
    }

    #[test]
    fn test_tempo_from_first_sound_with_attribute() {
        // The first <sound> has no tempo attribute and must not count.
        let xml = r#"<score-partwise><part><measure>
            <direction><sound dynamics="80"/></direction>
            <direction><sound tempo="96"/></direction>
            <direction><sound tempo="200"/></direction>
        </measure></part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        assert_eq!(doc.tempo, 96.0);
    }

    #[test]
    fn test_first_divisions_wins() {
        let xml = r#"<score-partwise><part>
            <measure><attributes><divisions>2</divisions></attributes></measure>
            <measure><attributes><divisions>8</divisions></attributes></measure>
        </part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        assert_eq!(doc.divisions, 2);
    }

    #[test]
    fn test_rest_detected() {
        let xml = r#"<score-partwise><part><measure>
            <note><rest/><duration>2</duration></note>
            <note><rest></rest><duration>3</duration></note>
        </measure></part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        assert_eq!(doc.notes.len(), 2);
        assert!(doc.notes[0].is_rest);
        assert_eq!(doc.notes[0].duration_ticks, 2);
        assert!(doc.notes[1].is_rest);
        assert_eq!(doc.notes[1].duration_ticks, 3);
    }

    #[test]
    fn test_alter_defaults_to_zero() {
        let xml = r#"<score-partwise><part><measure><note>
            <pitch><step>D</step><octave>5</octave></pitch>
            <duration>1</duration>
        </note></measure></part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        let pitch = doc.notes[0].pitch.as_ref().unwrap();
        assert_eq!(pitch.alter, 0);
        assert_eq!(pitch.step, 'D');
        assert_eq!(pitch.octave, 5);
    }

    #[test]
    fn test_note_without_pitch_kept_with_none() {
        let xml = r#"<score-partwise><part><measure>
            <note><duration>2</duration></note>
        </measure></part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        assert_eq!(doc.notes.len(), 1);
        assert!(!doc.notes[0].is_rest);
        assert_eq!(doc.notes[0].pitch, None);
        assert_eq!(doc.notes[0].duration_ticks, 2);
    }

    #[test]
    fn test_missing_duration_is_zero() {
        let xml = r#"<score-partwise><part><measure>
            <note><pitch><step>G</step><octave>4</octave></pitch></note>
        </measure></part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        assert_eq!(doc.notes[0].duration_ticks, 0);
    }

    #[test]
    fn test_backup_duration_not_misread() {
        // <backup> carries a <duration> too; it belongs to no note.
        let xml = r#"<score-partwise><part><measure>
            <note><pitch><step>A</step><octave>4</octave></pitch><duration>4</duration></note>
            <backup><duration>4</duration></backup>
            <note><pitch><step>B</step><octave>4</octave></pitch><duration>2</duration></note>
        </measure></part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        assert_eq!(doc.notes.len(), 2);
        assert_eq!(doc.notes[0].duration_ticks, 4);
        assert_eq!(doc.notes[1].duration_ticks, 2);
    }

    #[test]
    fn test_notes_in_document_order_across_measures() {
        let xml = r#"<score-partwise><part>
            <measure><note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note></measure>
            <measure><note><pitch><step>E</step><octave>4</octave></pitch><duration>1</duration></note></measure>
        </part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        let steps: Vec<char> = doc
            .notes
            .iter()
            .filter_map(|n| n.pitch.as_ref().map(|p| p.step))
            .collect();
        assert_eq!(steps, vec!['C', 'E']);
    }

    #[test]
    fn test_malformed_xml_is_fatal() {
        let xml = "<score-partwise><note><pitch></note></score-partwise>";
        let err = read_score(xml).unwrap_err();
        assert!(matches!(err, SolfaError::ParseError { .. }));
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let xml = r#"<score-partwise><part><measure>
            <attributes><divisions>zero</divisions></attributes>
            <note>
                <pitch><step>F</step><alter>sharp</alter><octave>four</octave></pitch>
                <duration>long</duration>
            </note>
        </measure></part></score-partwise>"#;
        let doc = read_score(xml).unwrap();
        assert_eq!(doc.divisions, 1);
        let pitch = doc.notes[0].pitch.as_ref().unwrap();
        assert_eq!(pitch.alter, 0);
        assert_eq!(pitch.octave, 4);
        assert_eq!(doc.notes[0].duration_ticks, 0);
    }
}
