//! Strokecast Library
//!
//! A Rust library for replaying recorded presentation sessions. A
//! recording is a set of pages, a time-sorted list of drawing actions
//! (strokes, erasures, text, page clears, page changes) and an audio
//! track. The player reconstructs what was on screen at any instant of
//! the audio clock and dispatches it to drawing surfaces.
//!
//! - [`lifecycle`]: the shared state machine and observer registry
//! - [`timeline`]: actions, pages and the rendered view at a time
//! - [`engine`]: [`ReplayEngine`], lifecycle-gated replay operations
//! - [`render`]: [`RenderCoordinator`] and the surface contracts
//! - [`clock`]: clock sources and their notifications
//! - [`session`]: [`PlayerSession`], which wires all of the above together
//! - [`recording`]: the on-disk recording format and its validation

pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod recording;
pub mod render;
pub mod session;
pub mod timeline;

pub use clock::{ClockEvent, ClockSource, ManualClock, PlaybackStatus};
pub use config::{Config, StopPolicy};
pub use engine::{EngineError, ReplayEngine};
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleState, Stateful};
pub use recording::{IngestionError, Recording};
pub use render::{RenderCoordinator, RenderError, Surface, Surfaces, VideoSurface};
pub use session::{PlayerSession, SessionError};
pub use timeline::{Action, ActionKind, ActionTimeline, Page, RenderedState};
