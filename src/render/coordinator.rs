//! Dispatches the rendered view to surfaces and keeps video aligned.

use crate::clock::PlaybackStatus;
use crate::lifecycle::{Lifecycle, LifecycleError, LifecycleState, Stateful, Subscription};
use crate::timeline::{ActionTimeline, Page, RenderedState, Tier};

use super::surface::{DrawCommand, Surfaces};
use super::RenderError;

/// Resource name used in lifecycle errors and logs.
pub const COORDINATOR_RESOURCE: &str = "render-coordinator";

/// Default drift tolerated before the video surface is seeked.
pub const DEFAULT_VIDEO_TOLERANCE_MS: u64 = 250;

/// What the permanent surface currently shows.
#[derive(Debug, Default)]
struct Drawn {
    page: Option<usize>,
    permanent: Vec<usize>,
}

/// Translates a [`RenderedState`] into surface commands.
///
/// The permanent tier is drawn incrementally when the new view extends the
/// previous one on the same page (forward playback) and redrawn from
/// scratch otherwise (seek, page change, clear). The volatile tier is
/// redrawn on every render.
pub struct RenderCoordinator {
    lifecycle: Lifecycle,
    surfaces: Option<Surfaces>,
    drawn: Drawn,
    video_tolerance_ms: u64,
    last_video_sync: Option<u64>,
    last_playback: Option<PlaybackStatus>,
    last_errors: Vec<RenderError>,
}

impl RenderCoordinator {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::new(COORDINATOR_RESOURCE),
            surfaces: None,
            drawn: Drawn::default(),
            video_tolerance_ms: DEFAULT_VIDEO_TOLERANCE_MS,
            last_video_sync: None,
            last_playback: None,
            last_errors: Vec::new(),
        }
    }

    pub fn with_video_tolerance(mut self, tolerance_ms: u64) -> Self {
        self.video_tolerance_ms = tolerance_ms;
        self
    }

    pub fn subscribe(&self, listener: impl FnMut(LifecycleState) + 'static) -> Subscription {
        self.lifecycle.subscribe(listener)
    }

    pub fn has_surfaces(&self) -> bool {
        self.surfaces.is_some()
    }

    /// Errors from the most recent render.
    pub fn last_errors(&self) -> &[RenderError] {
        &self.last_errors
    }

    /// Take ownership of the drawing targets once they are available.
    ///
    /// Surface acquisition may complete after playback has begun; the
    /// next render after attaching redraws everything.
    pub fn attach(&mut self, surfaces: Surfaces) -> Result<(), LifecycleError> {
        self.lifecycle.set_state(LifecycleState::Initializing)?;
        self.surfaces = Some(surfaces);
        self.drawn = Drawn::default();
        self.last_video_sync = None;
        self.last_playback = None;
        self.lifecycle.set_state(LifecycleState::Initialized)?;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.set_state(LifecycleState::Starting)?;
        self.lifecycle.set_state(LifecycleState::Started)
    }

    pub fn suspend(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.set_state(LifecycleState::Suspending)?;
        self.lifecycle.set_state(LifecycleState::Suspended)
    }

    pub fn stop(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.set_state(LifecycleState::Stopping)?;
        self.lifecycle.set_state(LifecycleState::Stopped)
    }

    /// Draw `state` to the surfaces.
    ///
    /// `page` is the document page for the state's active page. Each
    /// visible action is drawn independently: an action missing a render
    /// attribute fails only its own draw call, the rest of the view is
    /// still drawn, and the coordinator moves to `Error`. The first
    /// failure is returned; all of them are kept in
    /// [`last_errors`](Self::last_errors).
    pub fn render(
        &mut self,
        state: &RenderedState,
        timeline: &ActionTimeline,
        page: Option<&Page>,
    ) -> Result<(), RenderError> {
        if !matches!(
            self.state(),
            LifecycleState::Initialized
                | LifecycleState::Started
                | LifecycleState::Suspended
                | LifecycleState::Stopped
        ) {
            tracing::trace!(state = %self.state(), "render skipped");
            return Ok(());
        }
        let Some(surfaces) = self.surfaces.as_mut() else {
            return Ok(());
        };

        let mut errors = Vec::new();
        let active = state.active_page();
        let visible = state.visible(timeline);
        let permanent: Vec<usize> = visible
            .iter()
            .filter(|v| v.tier == Tier::Permanent)
            .map(|v| v.index)
            .collect();

        let page_changed = active != self.drawn.page;
        if page_changed {
            if let Some(old) = self.drawn.page {
                surfaces.permanent.clear(old);
                surfaces.volatile.clear(old);
            }
            if let Some(page) = page {
                surfaces.permanent.show_page(page);
                surfaces.volatile.show_page(page);
            }
        }

        // Only actions that reached the surface count as drawn, so a failed
        // one is attempted again on the next render.
        let mut drawn = Vec::with_capacity(permanent.len());
        if let Some(active) = active {
            let extends = !page_changed && permanent.starts_with(&self.drawn.permanent);
            let already = if extends {
                drawn.extend_from_slice(&self.drawn.permanent);
                self.drawn.permanent.len()
            } else {
                surfaces.permanent.clear(active);
                0
            };

            for v in visible
                .iter()
                .filter(|v| v.tier == Tier::Permanent)
                .skip(already)
            {
                match DrawCommand::from_visible(v) {
                    Ok(command) => {
                        surfaces.permanent.draw(active, &command);
                        drawn.push(v.index);
                    }
                    Err(err) => errors.push(err),
                }
            }

            surfaces.volatile.clear(active);
            for v in visible.iter().filter(|v| v.tier == Tier::Volatile) {
                match DrawCommand::from_visible(v) {
                    Ok(command) => surfaces.volatile.draw(active, &command),
                    Err(err) => errors.push(err),
                }
            }
        }

        self.drawn = Drawn {
            page: active,
            permanent: drawn,
        };

        for err in &errors {
            tracing::error!(error = %err, "draw call failed");
        }
        let first = errors.first().cloned();
        self.last_errors = errors;

        match first {
            Some(err) => {
                self.lifecycle.fail();
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Align the video surface with the clock.
    ///
    /// Repeated calls with the same time do nothing, and the media element
    /// is only seeked once it has drifted past the tolerance.
    pub fn update_video_sync(&mut self, time_ms: u64) {
        if self.last_video_sync == Some(time_ms) {
            return;
        }
        let Some(video) = self.surfaces.as_mut().and_then(|s| s.video.as_mut()) else {
            return;
        };
        self.last_video_sync = Some(time_ms);

        let drift = video.position_ms().abs_diff(time_ms);
        if drift > self.video_tolerance_ms {
            tracing::debug!(time_ms, drift, "video resynced");
            video.seek_to(time_ms);
        }
    }

    /// Mirror the clock's playback state onto the video surface.
    ///
    /// Independent of the drawing lifecycle: a suspended or failed
    /// coordinator still forwards playback changes.
    pub fn update_video_playback_state(&mut self, status: PlaybackStatus) {
        if self.last_playback == Some(status) {
            return;
        }
        let Some(video) = self.surfaces.as_mut().and_then(|s| s.video.as_mut()) else {
            return;
        };
        self.last_playback = Some(status);
        video.set_playback(status);
    }

    /// Release every surface. Safe to call repeatedly or before
    /// [`attach`](Self::attach).
    pub fn destroy(&mut self) -> Result<(), LifecycleError> {
        if matches!(
            self.state(),
            LifecycleState::Destroying | LifecycleState::Destroyed
        ) {
            return Ok(());
        }

        self.lifecycle.set_state(LifecycleState::Destroying)?;
        if let Some(mut surfaces) = self.surfaces.take() {
            surfaces.release_all();
        }
        self.drawn = Drawn::default();
        self.last_video_sync = None;
        self.last_playback = None;
        self.lifecycle.set_state(LifecycleState::Destroyed)
    }
}

impl Default for RenderCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Stateful for RenderCoordinator {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}
