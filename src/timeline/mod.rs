//! Recorded actions and the time-indexed view over them.
//!
//! - `action`: the [`Action`] record and its opaque [`Payload`]
//! - `page`: document pages and the [`PageSource`] capability
//! - `timeline`: the ordered [`ActionTimeline`]
//! - `rendered`: [`RenderedState`], the visible set at a given time

mod action;
mod page;
mod rendered;
#[allow(clippy::module_inception)]
mod timeline;

pub use action::{Action, ActionKind, Font, Payload, Point, Rect, StrokePoint};
pub use page::{Page, PageSource};
pub use rendered::{RenderedState, Tier, VisibleAction};
pub use timeline::ActionTimeline;
