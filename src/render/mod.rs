//! Rendering side of the player.
//!
//! - `surface`: the [`Surface`] / [`VideoSurface`] contracts and [`DrawCommand`]
//! - `coordinator`: [`RenderCoordinator`], which turns a rendered view into
//!   surface commands and keeps the video surface on the clock
//! - `memory`: recording surfaces for tests and headless use
//! - `text`: a line-per-command surface used by the CLI

mod coordinator;
mod error;
mod memory;
mod surface;
pub mod text;

pub use coordinator::{RenderCoordinator, COORDINATOR_RESOURCE, DEFAULT_VIDEO_TOLERANCE_MS};
pub use error::RenderError;
pub use memory::{MemorySurface, MemoryVideo, SurfaceCall, SurfaceLog, VideoLog};
pub use surface::{DrawCommand, Surface, Surfaces, VideoSurface};
pub use text::TextSurface;
