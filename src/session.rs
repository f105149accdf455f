//! Player session: one engine, one coordinator, one clock.
//!
//! A [`PlayerSession`] is the context object the host view owns for as
//! long as a recording is loaded. Mounting builds and initializes the
//! engine; dropping (or [`PlayerSession::unmount`]) destroys it and
//! releases the surfaces. There is no global "current player".
//!
//! Clock notifications enter through [`PlayerSession::handle`] and are
//! resolved completely, view recomputed and dispatched, before it
//! returns. Failures while handling a notification put the engine into
//! `Error` and are logged; they are never returned to the clock.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::clock::{ClockEvent, ClockSource, PlaybackStatus};
use crate::config::PlaybackConfig;
use crate::engine::{EngineError, ReplayEngine};
use crate::lifecycle::{LifecycleError, LifecycleState, Stateful, Subscription};
use crate::recording::{IngestionError, Recording};
use crate::render::{RenderCoordinator, Surfaces};
use crate::timeline::Action;

/// Errors returned while mounting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid recording: {0}")]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Owns the engine and coordinator for one loaded recording.
pub struct PlayerSession {
    engine: ReplayEngine,
    coordinator: RenderCoordinator,
    transitions: Rc<RefCell<VecDeque<LifecycleState>>>,
    _engine_subscription: Subscription,
}

impl PlayerSession {
    /// Validate `recording`, build the engine and initialize it.
    pub fn mount(recording: Recording, config: &PlaybackConfig) -> Result<Self, SessionError> {
        let engine = ReplayEngine::from_recording(recording)?.with_stop_policy(config.stop_policy);
        let coordinator =
            RenderCoordinator::new().with_video_tolerance(config.video_sync_tolerance_ms);
        let mut session = Self::with_parts(engine, coordinator);
        session.engine.init()?;
        session.drain_transitions();
        Ok(session)
    }

    /// Wrap an engine and coordinator built by the caller.
    pub fn with_parts(engine: ReplayEngine, coordinator: RenderCoordinator) -> Self {
        let transitions = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&transitions);
        let subscription = engine.subscribe(move |state| sink.borrow_mut().push_back(state));

        Self {
            engine,
            coordinator,
            transitions,
            _engine_subscription: subscription,
        }
    }

    pub fn engine(&self) -> &ReplayEngine {
        &self.engine
    }

    pub fn coordinator(&self) -> &RenderCoordinator {
        &self.coordinator
    }

    /// Observe engine transitions. The listener stays registered until
    /// the returned guard is dropped.
    pub fn subscribe(&self, listener: impl FnMut(LifecycleState) + 'static) -> Subscription {
        self.engine.subscribe(listener)
    }

    /// Hand the acquired surfaces to the coordinator and draw the
    /// current view onto them.
    pub fn attach_surfaces(&mut self, surfaces: Surfaces) -> Result<(), LifecycleError> {
        self.coordinator.attach(surfaces)?;
        match self.engine.state() {
            LifecycleState::Started => self.mirror(LifecycleState::Starting),
            LifecycleState::Suspended => {
                self.mirror(LifecycleState::Starting);
                self.mirror(LifecycleState::Suspending);
            }
            _ => {}
        }
        self.render();
        Ok(())
    }

    /// Process one clock notification.
    pub fn handle(&mut self, clock: &dyn ClockSource, event: ClockEvent) {
        tracing::trace!(?event, state = %self.engine.state(), "clock event");

        match event {
            ClockEvent::TimeUpdate(time_ms) => {
                if clock.is_seeking() {
                    self.seek_to(time_ms);
                } else {
                    self.follow(time_ms);
                }
            }
            ClockEvent::SeekingChanged(true) => {}
            ClockEvent::SeekingChanged(false) => {
                let time_ms = clock.current_time_ms();
                self.seek_to(time_ms);
                self.coordinator.update_video_sync(time_ms);
            }
            ClockEvent::PlaybackStateChanged(status) => {
                self.coordinator.update_video_playback_state(status);
                self.apply_playback(status, clock.current_time_ms());
            }
        }

        self.drain_transitions();
    }

    /// Start (or recover) playback.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let result = self.engine.start();
        self.drain_transitions();
        result
    }

    pub fn suspend(&mut self) -> Result<(), EngineError> {
        let result = self.engine.suspend();
        self.drain_transitions();
        result
    }

    pub fn stop(&mut self) -> Result<(), EngineError> {
        let result = self.engine.stop();
        self.drain_transitions();
        result
    }

    /// Seek directly, outside of clock notifications.
    pub fn seek(&mut self, time_ms: u64) -> Result<(), EngineError> {
        self.engine.seek_by_time(time_ms)?;
        self.render();
        self.drain_transitions();
        Ok(())
    }

    /// Replace the recorded actions while mounted and redraw.
    ///
    /// The lifecycle state is left as it is.
    pub fn set_recorded_pages(&mut self, actions: Vec<Action>) {
        self.engine.set_recorded_pages(actions);
        self.render();
        self.drain_transitions();
    }

    /// Destroy the engine and release the surfaces now.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn apply_playback(&mut self, status: PlaybackStatus, time_ms: u64) {
        let state = self.engine.state();
        let result = match status {
            PlaybackStatus::Playing
                if matches!(
                    state,
                    LifecycleState::Initialized | LifecycleState::Suspended | LifecycleState::Stopped
                ) =>
            {
                self.engine.start().and_then(|()| self.engine.advance_to(time_ms))
            }
            PlaybackStatus::Paused | PlaybackStatus::Error if state == LifecycleState::Started => {
                self.engine.suspend()
            }
            PlaybackStatus::Ended
                if matches!(state, LifecycleState::Started | LifecycleState::Suspended) =>
            {
                self.engine.stop()
            }
            _ => {
                tracing::debug!(%status, %state, "playback change needs no transition");
                Ok(())
            }
        };

        match result {
            Ok(()) => self.drain_and_render(),
            Err(err) => self.report(&err),
        }
    }

    fn follow(&mut self, time_ms: u64) {
        if self.engine.is_started() {
            if let Err(err) = self.engine.advance_to(time_ms) {
                self.report(&err);
                return;
            }
            self.render();
        }
        if !self.engine.is_destroyed() {
            self.coordinator.update_video_sync(time_ms);
        }
    }

    fn seek_to(&mut self, time_ms: u64) {
        if !matches!(
            self.engine.state(),
            LifecycleState::Started | LifecycleState::Suspended
        ) {
            tracing::debug!(time_ms, state = %self.engine.state(), "seek ignored");
            return;
        }
        match self.engine.seek_by_time(time_ms) {
            Ok(()) => self.render(),
            Err(err) => self.report(&err),
        }
    }

    fn render(&mut self) {
        let Some(timeline) = self.engine.timeline() else {
            return;
        };
        let page = self.engine.active_page();
        let result = self
            .coordinator
            .render(self.engine.rendered(), timeline, page.as_ref());
        if let Err(err) = result {
            self.engine.fail(&err.to_string());
        }
    }

    fn report(&mut self, err: &EngineError) {
        self.engine.fail(&err.to_string());
    }

    fn drain_and_render(&mut self) {
        self.drain_transitions();
        self.render();
    }

    /// React to queued engine transitions, in order.
    fn drain_transitions(&mut self) {
        loop {
            let next = self.transitions.borrow_mut().pop_front();
            let Some(state) = next else {
                break;
            };
            match state {
                LifecycleState::Started => {
                    self.mirror(LifecycleState::Starting);
                    self.render();
                }
                LifecycleState::Suspended => self.mirror(LifecycleState::Suspending),
                LifecycleState::Stopped => {
                    self.mirror(LifecycleState::Stopping);
                    self.render();
                }
                LifecycleState::Destroyed => {
                    if let Err(err) = self.coordinator.destroy() {
                        tracing::warn!(error = %err, "coordinator teardown failed");
                    }
                }
                LifecycleState::Error => {
                    tracing::warn!(previous = ?self.engine.previous_state(), "engine entered error state");
                }
                _ => {}
            }
        }
    }

    /// Drive the coordinator through the transition beginning with
    /// `first`, if its current state allows it.
    fn mirror(&mut self, first: LifecycleState) {
        if !self.coordinator.state().can_transition_to(first) {
            return;
        }
        let result = match first {
            LifecycleState::Starting => self.coordinator.start(),
            LifecycleState::Suspending => self.coordinator.suspend(),
            LifecycleState::Stopping => self.coordinator.stop(),
            _ => Ok(()),
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "coordinator transition failed");
        }
    }

    fn teardown(&mut self) {
        if let Err(err) = self.engine.destroy() {
            tracing::warn!(error = %err, "engine teardown failed");
        }
        self.drain_transitions();
        if let Err(err) = self.coordinator.destroy() {
            tracing::warn!(error = %err, "coordinator teardown failed");
        }
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
