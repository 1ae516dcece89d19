//! # Playback Scheduler
//!
//! Owns a tempo-aware transport clock and dispatches compiled events to the
//! instrument backend at the correct wall-clock offsets, optionally driving
//! a visual cursor in lockstep.
//!
//! ## Session lifecycle
//! ```text
//! Idle -> Playing -> (Completed | Canceled) -> Idle
//! ```
//! At most one session is active per scheduler. Starting while a session is
//! playing cancels it first, so two sessions can never overlap their audio.
//! A session auto-completes half a second after its last event ends, giving
//! the final note's tail time to ring out before the clock halts and the
//! cursor is hidden.
//!
//! ## Timing model
//! The core is single-threaded and cooperative. `start` converts beat times
//! to seconds (`beats * 60 / tempo`) and queues triggers in stable offset
//! order; the host timing loop - an audio-graph clock, a timer queue,
//! whatever is available - repeatedly calls [`Scheduler::advance_to`] with
//! the elapsed session time, and every trigger that has come due fires in
//! order. The scheduler never owns the backend's resources; it only invokes
//! them.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::SolfaError;
use crate::pitch::normalize_for_playback;
use crate::playback::{PlaybackData, PlaybackNote};

/// Seconds kept on the clock after the final event so the last note's
/// sound tail can finish and the cursor can settle.
pub const TRAILING_MARGIN_SECS: f64 = 0.5;

/// Loading state of the instrument backend's sample set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendReadiness {
    NotReady,
    Ready,
}

/// The instrument backend the scheduler triggers notes on.
pub trait Instrument {
    /// Whether the sample set has finished loading. [`Scheduler::start`]
    /// refuses to schedule anything against a backend that is not ready.
    fn readiness(&self) -> BackendReadiness;

    /// Sound `note` for `duration_secs`, starting `at_secs` after session
    /// start. Names arrive sharp-normalized (`"A#3"`, never `"Bb3"`).
    fn trigger_attack_release(&mut self, note: &str, duration_secs: f64, at_secs: f64);
}

/// Visual cursor driven in lockstep with the note triggers.
///
/// The first callback of a session is `reveal` - the cursor stays hidden
/// until the first note actually sounds - and every later one is
/// `advance`. `hide` is called when the session completes or is canceled.
pub trait CursorFollower {
    fn reveal(&mut self);
    fn advance(&mut self);
    fn hide(&mut self);
}

/// Where the scheduler is in the session lifecycle.
///
/// `Completed` and `Canceled` are resting states: no session is active and
/// `start` may be called again, exactly as from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Completed,
    Canceled,
}

enum TriggerKind {
    /// Move (or first reveal) the cursor.
    Cursor,
    /// Fire the instrument.
    Note { note: String, duration_secs: f64 },
    /// End of session, after the trailing margin.
    Complete,
}

struct Trigger {
    at_secs: f64,
    kind: TriggerKind,
}

/// Transient per-playback state. Created by `start`, destroyed on
/// completion or cancellation.
struct Session {
    pending: VecDeque<Trigger>,
    total_duration: f64,
    /// Transport clock position, seconds since session start.
    clock: f64,
    cursor_revealed: bool,
}

/// Schedules compiled playback data against the instrument backend.
pub struct Scheduler {
    instrument: Box<dyn Instrument>,
    cursor: Option<Box<dyn CursorFollower>>,
    session: Option<Session>,
    state: PlaybackState,
}

impl Scheduler {
    pub fn new(instrument: Box<dyn Instrument>) -> Self {
        Self {
            instrument,
            cursor: None,
            session: None,
            state: PlaybackState::Idle,
        }
    }

    /// Attach a cursor to drive during playback.
    pub fn with_cursor(mut self, cursor: Box<dyn CursorFollower>) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Transport position of the active session in seconds, if one exists.
    pub fn position(&self) -> Option<f64> {
        self.session.as_ref().map(|s| s.clock)
    }

    /// Wall-clock length of the active session's timeline, excluding the
    /// trailing margin.
    pub fn total_duration(&self) -> Option<f64> {
        self.session.as_ref().map(|s| s.total_duration)
    }

    /// Start playing `data` from the top.
    ///
    /// Any session that is still playing is canceled first - its pending
    /// triggers are discarded before anything new is scheduled, so at most
    /// one audio stream exists at any time. An event list that is empty
    /// completes immediately: no triggers, no error.
    ///
    /// # Errors
    /// - [`SolfaError::InvalidArgument`] if the tempo is not a positive,
    ///   finite number. Nothing is canceled or scheduled.
    /// - [`SolfaError::NotReady`] if the backend's samples are still
    ///   loading. Nothing is scheduled and the state is unchanged.
    pub fn start(&mut self, data: &PlaybackData) -> Result<(), SolfaError> {
        if !(data.tempo.is_finite() && data.tempo > 0.0) {
            return Err(SolfaError::InvalidArgument(format!(
                "tempo must be a positive number of beats per minute, got {}",
                data.tempo
            )));
        }
        if self.instrument.readiness() == BackendReadiness::NotReady {
            return Err(SolfaError::NotReady);
        }

        if self.state == PlaybackState::Playing {
            self.cancel();
        }

        if data.notes.is_empty() {
            debug!("no events to schedule, completing immediately");
            self.session = None;
            self.state = PlaybackState::Completed;
            return Ok(());
        }

        let seconds_per_beat = 60.0 / data.tempo;

        // Stable order: ties on the start time keep document order.
        let mut ordered: Vec<&PlaybackNote> = data.notes.iter().collect();
        ordered.sort_by(|a, b| {
            a.time
                .partial_cmp(&b.time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let has_cursor = self.cursor.is_some();
        let mut pending = VecDeque::with_capacity(ordered.len() * 2 + 1);
        let mut total_duration: f64 = 0.0;

        for event in &ordered {
            let at_secs = event.time * seconds_per_beat;
            let duration_secs = event.duration * seconds_per_beat;
            // The cursor lands on a note just as it starts sounding, so its
            // callback fires immediately before the trigger.
            if has_cursor {
                pending.push_back(Trigger {
                    at_secs,
                    kind: TriggerKind::Cursor,
                });
            }
            pending.push_back(Trigger {
                at_secs,
                kind: TriggerKind::Note {
                    note: normalize_for_playback(&event.note),
                    duration_secs,
                },
            });
            total_duration = total_duration.max(at_secs + duration_secs);
        }

        pending.push_back(Trigger {
            at_secs: total_duration + TRAILING_MARGIN_SECS,
            kind: TriggerKind::Complete,
        });

        debug!(
            events = ordered.len(),
            tempo = data.tempo,
            total_duration,
            "session started"
        );

        self.session = Some(Session {
            pending,
            total_duration,
            clock: 0.0,
            cursor_revealed: false,
        });
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Advance the transport clock to `now_secs` (seconds since session
    /// start) and fire every trigger that has come due, in order.
    ///
    /// This is the host timing loop's entry point. A clock that would move
    /// backwards is clamped to the current position, so nothing re-fires.
    /// No-op outside of `Playing`.
    pub fn advance_to(&mut self, now_secs: f64) {
        if self.state != PlaybackState::Playing {
            return;
        }

        let mut completed = false;
        if let Some(session) = self.session.as_mut() {
            let now = now_secs.max(session.clock);
            session.clock = now;

            while session
                .pending
                .front()
                .map_or(false, |t| t.at_secs <= now)
            {
                let Some(trigger) = session.pending.pop_front() else {
                    break;
                };
                match trigger.kind {
                    TriggerKind::Cursor => {
                        if let Some(cursor) = self.cursor.as_mut() {
                            if session.cursor_revealed {
                                cursor.advance();
                            } else {
                                cursor.reveal();
                                session.cursor_revealed = true;
                            }
                        }
                    }
                    TriggerKind::Note {
                        note,
                        duration_secs,
                    } => {
                        self.instrument.trigger_attack_release(
                            &note,
                            duration_secs,
                            trigger.at_secs,
                        );
                    }
                    TriggerKind::Complete => {
                        completed = true;
                        break;
                    }
                }
            }
        }

        if completed {
            if let Some(cursor) = self.cursor.as_mut() {
                cursor.hide();
            }
            self.session = None;
            self.state = PlaybackState::Completed;
            debug!("session completed");
        }
    }

    /// Stop the active session immediately: halt the clock, discard every
    /// not-yet-fired trigger, hide the cursor.
    ///
    /// Idempotent - calling from `Idle`, `Completed` or `Canceled` is a
    /// no-op.
    pub fn cancel(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.session = None;
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.hide();
        }
        self.state = PlaybackState::Canceled;
        debug!("session canceled");
    }
}
