//! Clock source abstraction.
//!
//! The clock is whatever drives the media timeline (an audio element, a
//! video element, a simulated timer). The player never reads it on its
//! own; it reacts to [`ClockEvent`]s, processed strictly in the order
//! they are emitted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Playback state reported by the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Ended,
    Error,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Ended => "ended",
            PlaybackStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Change notification from a clock source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Current time moved (milliseconds)
    TimeUpdate(u64),
    PlaybackStateChanged(PlaybackStatus),
    SeekingChanged(bool),
}

/// Read access to the current clock values.
pub trait ClockSource {
    fn current_time_ms(&self) -> u64;
    fn playback_state(&self) -> PlaybackStatus;
    fn is_seeking(&self) -> bool;
}

/// A clock driven by explicit calls.
///
/// Every setter returns the notification it produced, or `None` when the
/// value did not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualClock {
    time_ms: u64,
    status: PlaybackStatus,
    seeking: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            time_ms: 0,
            status: PlaybackStatus::Paused,
            seeking: false,
        }
    }

    pub fn set_time(&mut self, time_ms: u64) -> Option<ClockEvent> {
        if self.time_ms == time_ms {
            return None;
        }
        self.time_ms = time_ms;
        Some(ClockEvent::TimeUpdate(time_ms))
    }

    /// Advance by `delta_ms`, saturating.
    pub fn tick(&mut self, delta_ms: u64) -> Option<ClockEvent> {
        self.set_time(self.time_ms.saturating_add(delta_ms))
    }

    pub fn set_playback(&mut self, status: PlaybackStatus) -> Option<ClockEvent> {
        if self.status == status {
            return None;
        }
        self.status = status;
        Some(ClockEvent::PlaybackStateChanged(status))
    }

    pub fn set_seeking(&mut self, seeking: bool) -> Option<ClockEvent> {
        if self.seeking == seeking {
            return None;
        }
        self.seeking = seeking;
        Some(ClockEvent::SeekingChanged(seeking))
    }

    /// The event sequence a media element emits for a user seek:
    /// seeking on, the new time, seeking off.
    pub fn seek(&mut self, time_ms: u64) -> Vec<ClockEvent> {
        let mut events = Vec::with_capacity(3);
        events.extend(self.set_seeking(true));
        events.extend(self.set_time(time_ms));
        events.extend(self.set_seeking(false));
        events
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for ManualClock {
    fn current_time_ms(&self) -> u64 {
        self.time_ms
    }

    fn playback_state(&self) -> PlaybackStatus {
        self.status
    }

    fn is_seeking(&self) -> bool {
        self.seeking
    }
}
