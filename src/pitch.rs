//! Pitch spelling helpers.
//!
//! MusicXML spells a pitch as a (step, alter, octave) triple. The playback
//! engine wants a single name like `"C#4"`, and the piano sample set the
//! instrument backend loads is indexed by sharp names only, so conventional
//! flat spellings are rewritten to their sharp equivalents before a note is
//! triggered.

/// Build the canonical pitch name for a (step, alter, octave) triple.
///
/// `alter == 1` appends `#`, `alter == -1` appends `b`. Double sharps and
/// flats (`alter` of ±2) are not representable in this naming scheme and
/// pass through as the plain step.
///
/// # Example
/// ```
/// use solfa::pitch_name;
///
/// assert_eq!(pitch_name('C', 1, 4), "C#4");
/// assert_eq!(pitch_name('B', -1, 3), "Bb3");
/// assert_eq!(pitch_name('D', 0, 5), "D5");
/// ```
pub fn pitch_name(step: char, alter: i8, octave: i32) -> String {
    let accidental = match alter {
        1 => "#",
        -1 => "b",
        _ => "",
    };
    format!("{}{}{}", step, accidental, octave)
}

/// Rewrite a conventional flat spelling to its sharp equivalent.
///
/// The sample library is indexed by sharp names, so `Db`, `Eb`, `Gb`, `Ab`
/// and `Bb` become `C#`, `D#`, `F#`, `G#` and `A#` with the octave suffix
/// unchanged. Any other name passes through as-is. Total over everything
/// [`pitch_name`] can produce.
///
/// # Example
/// ```
/// use solfa::normalize_for_playback;
///
/// assert_eq!(normalize_for_playback("Bb3"), "A#3");
/// assert_eq!(normalize_for_playback("D5"), "D5");
/// ```
pub fn normalize_for_playback(name: &str) -> String {
    let bytes = name.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b'b' {
        let sharp = match bytes[0] {
            b'D' => Some("C#"),
            b'E' => Some("D#"),
            b'G' => Some("F#"),
            b'A' => Some("G#"),
            b'B' => Some("A#"),
            _ => None,
        };
        if let Some(sharp) = sharp {
            return format!("{}{}", sharp, &name[2..]);
        }
    }
    name.to_string()
}
