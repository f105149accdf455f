//! Timeline replay engine.
//!
//! [`ReplayEngine`] owns the [`ActionTimeline`] of one recording and
//! answers "what is visible at time T" through lifecycle-gated
//! operations:
//!
//! - `init` establishes the time-0 view
//! - `start` / `suspend` / `stop` drive playback
//! - `seek_by_time` recomputes the view for any time
//! - `advance_to` follows the clock forward while started
//! - `destroy` releases the timeline
//!
//! Every recompute builds the new [`RenderedState`] aside and swaps it in,
//! so no caller ever observes a half-applied view.

mod error;

pub use error::EngineError;

use crate::config::StopPolicy;
use crate::lifecycle::{Lifecycle, LifecycleState, Stateful, Subscription};
use crate::recording::{IngestionError, Recording};
use crate::timeline::{Action, ActionTimeline, Page, PageSource, RenderedState};

/// Resource name used in lifecycle errors and logs.
pub const ENGINE_RESOURCE: &str = "replay-engine";

/// Replays one recording's actions against a clock position.
pub struct ReplayEngine {
    lifecycle: Lifecycle,
    pages: Box<dyn PageSource>,
    timeline: Option<ActionTimeline>,
    rendered: RenderedState,
    stop_policy: StopPolicy,
}

impl ReplayEngine {
    pub fn new(pages: Box<dyn PageSource>) -> Self {
        Self {
            lifecycle: Lifecycle::new(ENGINE_RESOURCE),
            pages,
            timeline: None,
            rendered: RenderedState::default(),
            stop_policy: StopPolicy::default(),
        }
    }

    /// Build an engine from a validated recording.
    ///
    /// Invalid recordings are rejected here, before the engine exists, so
    /// an engine can never reach `Initialized` on bad input.
    pub fn from_recording(recording: Recording) -> Result<Self, IngestionError> {
        recording.validate()?;
        let Recording { pages, actions, .. } = recording;
        let mut engine = Self::new(Box::new(pages));
        engine.set_recorded_pages(actions);
        Ok(engine)
    }

    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }

    pub fn stop_policy(&self) -> StopPolicy {
        self.stop_policy
    }

    /// The timeline, unless the engine has been destroyed or never fed.
    pub fn timeline(&self) -> Option<&ActionTimeline> {
        self.timeline.as_ref()
    }

    pub fn rendered(&self) -> &RenderedState {
        &self.rendered
    }

    /// Time of the current rendered view.
    pub fn position_ms(&self) -> u64 {
        self.rendered.time_ms()
    }

    pub fn page(&self, index: usize) -> Option<Page> {
        self.pages.page(index)
    }

    /// Document page for the active page of the current view.
    pub fn active_page(&self) -> Option<Page> {
        self.rendered.active_page().and_then(|i| self.pages.page(i))
    }

    pub fn subscribe(&self, listener: impl FnMut(LifecycleState) + 'static) -> Subscription {
        self.lifecycle.subscribe(listener)
    }

    /// Replace the recorded action set.
    ///
    /// Allowed in any state and never changes the lifecycle state. Any view
    /// the engine holds is recomputed at the current position against the
    /// new timeline; actions already visible stay visible unless the new
    /// set removes them. A stopped view keeps its stop policy applied.
    pub fn set_recorded_pages(&mut self, actions: Vec<Action>) {
        let timeline = ActionTimeline::new(actions);
        let missing = timeline.missing_pages(self.pages.as_ref());
        if !missing.is_empty() {
            tracing::warn!(?missing, "actions reference pages the page source does not know");
        }
        tracing::debug!(actions = timeline.len(), state = %self.state(), "recorded pages updated");

        let time_ms = self.rendered.time_ms();
        match self.state() {
            LifecycleState::Initialized
            | LifecycleState::Started
            | LifecycleState::Suspended
            | LifecycleState::Error => {
                self.rendered = RenderedState::at(&timeline, time_ms);
            }
            LifecycleState::Stopped => match self.stop_policy {
                StopPolicy::Finalize => {
                    let mut rendered = RenderedState::at(&timeline, time_ms);
                    rendered.discard_volatile(&timeline);
                    self.rendered = rendered;
                }
                StopPolicy::Clear => self.rendered = RenderedState::default(),
            },
            _ => {}
        }
        self.timeline = Some(timeline);
    }

    /// Build the time-0 view and move to `Initialized`.
    ///
    /// Valid from `Created` and, for a reload, from `Destroyed`. Actions
    /// may have been queued with [`set_recorded_pages`](Self::set_recorded_pages)
    /// before this call; if none were, the engine starts with an empty
    /// timeline.
    pub fn init(&mut self) -> Result<(), EngineError> {
        self.lifecycle.set_state(LifecycleState::Initializing)?;

        let timeline = self.timeline.get_or_insert_with(|| {
            tracing::debug!("init without recorded actions, using an empty timeline");
            ActionTimeline::empty()
        });
        self.rendered = RenderedState::at(timeline, 0);

        self.lifecycle.set_state(LifecycleState::Initialized)?;
        Ok(())
    }

    /// Resume following the clock.
    ///
    /// Coming back from `Stopped` or `Error` rebuilds the view at the
    /// current position, since stop and failure may have left it trimmed.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let from = self.state();
        self.lifecycle.set_state(LifecycleState::Starting)?;

        if matches!(from, LifecycleState::Stopped | LifecycleState::Error) {
            let timeline = self.timeline.get_or_insert_with(ActionTimeline::empty);
            self.rendered = RenderedState::at(timeline, self.rendered.time_ms());
        }

        self.lifecycle.set_state(LifecycleState::Started)?;
        Ok(())
    }

    /// Freeze clock following and in-progress drawing; the view is kept
    /// exactly as it is.
    pub fn suspend(&mut self) -> Result<(), EngineError> {
        self.lifecycle.set_state(LifecycleState::Suspending)?;
        self.lifecycle.set_state(LifecycleState::Suspended)?;
        Ok(())
    }

    /// Halt playback and discard in-progress drawing per the stop policy.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.lifecycle.set_state(LifecycleState::Stopping)?;

        match self.stop_policy {
            StopPolicy::Finalize => {
                if let Some(timeline) = &self.timeline {
                    self.rendered.discard_volatile(timeline);
                }
            }
            StopPolicy::Clear => self.rendered = RenderedState::default(),
        }

        self.lifecycle.set_state(LifecycleState::Stopped)?;
        Ok(())
    }

    /// Recompute the view for `time_ms` from the whole timeline.
    ///
    /// Valid while started or suspended. The result depends only on the
    /// timeline and `time_ms`, never on where the engine was before.
    pub fn seek_by_time(&mut self, time_ms: u64) -> Result<(), EngineError> {
        self.require(
            "seek",
            &[LifecycleState::Started, LifecycleState::Suspended],
        )?;

        let timeline = self.timeline.get_or_insert_with(ActionTimeline::empty);
        let rendered = RenderedState::at(timeline, time_ms);
        tracing::debug!(time_ms, visible = rendered.visible_indices().len(), "seek");
        self.rendered = rendered;
        Ok(())
    }

    /// Follow the clock forward to `time_ms`, applying only new actions.
    ///
    /// Valid while started. A `time_ms` behind the current position is
    /// handled as a full recompute, so the result always equals
    /// `seek_by_time(time_ms)`.
    pub fn advance_to(&mut self, time_ms: u64) -> Result<(), EngineError> {
        self.require("advance", &[LifecycleState::Started])?;

        let timeline = self.timeline.get_or_insert_with(ActionTimeline::empty);
        let mut rendered = self.rendered.clone();
        rendered.advance(timeline, time_ms);
        self.rendered = rendered;
        Ok(())
    }

    /// Release the timeline and move to `Destroyed`.
    ///
    /// Calling this on an engine that is already destroyed does nothing.
    pub fn destroy(&mut self) -> Result<(), EngineError> {
        if matches!(
            self.state(),
            LifecycleState::Destroying | LifecycleState::Destroyed
        ) {
            tracing::debug!("destroy on an already destroyed engine ignored");
            return Ok(());
        }

        self.lifecycle.set_state(LifecycleState::Destroying)?;
        self.timeline = None;
        self.rendered = RenderedState::default();
        self.lifecycle.set_state(LifecycleState::Destroyed)?;
        Ok(())
    }

    /// Report a failure: move to `Error`, keeping the current view.
    ///
    /// Returns false if the current state has no error edge.
    pub fn fail(&mut self, reason: &str) -> bool {
        tracing::error!(state = %self.state(), reason, "replay engine failed");
        self.lifecycle.fail()
    }

    fn require(&self, operation: &'static str, allowed: &[LifecycleState]) -> Result<(), EngineError> {
        let state = self.state();
        if allowed.contains(&state) {
            Ok(())
        } else {
            Err(EngineError::OperationNotAllowed { operation, state })
        }
    }
}

impl Stateful for ReplayEngine {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

impl std::fmt::Debug for ReplayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayEngine")
            .field("state", &self.state())
            .field("actions", &self.timeline.as_ref().map(ActionTimeline::len))
            .field("position_ms", &self.position_ms())
            .field("stop_policy", &self.stop_policy)
            .finish()
    }
}
