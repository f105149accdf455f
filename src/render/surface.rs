//! Drawing targets and the draw commands sent to them.

use crate::clock::PlaybackStatus;
use crate::timeline::{ActionKind, Font, Page, Point, Rect, VisibleAction};

use super::RenderError;

/// A single draw primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Polyline through the points drawn so far
    Stroke {
        color: String,
        width: f32,
        points: Vec<Point>,
    },
    Erase {
        region: Rect,
    },
    Text {
        text: String,
        position: Point,
        font: Font,
    },
    /// The page became active
    PageMarker {
        page: usize,
    },
}

impl DrawCommand {
    /// Translate a visible action into its draw primitive.
    ///
    /// In-progress strokes only include the points sampled up to the
    /// visible action's progress.
    pub fn from_visible(visible: &VisibleAction<'_>) -> Result<Self, RenderError> {
        let action = visible.action;
        let payload = &action.payload;
        let missing = |attribute: &'static str| RenderError::MissingRenderAttribute {
            kind: action.kind,
            page: action.page_index,
            timestamp_ms: action.timestamp_ms,
            attribute,
        };

        match action.kind {
            ActionKind::Stroke => {
                let color = payload.color.clone().ok_or_else(|| missing("color"))?;
                let width = payload.width.ok_or_else(|| missing("width"))?;
                if payload.points.is_empty() {
                    return Err(missing("points"));
                }
                let points = payload
                    .points
                    .iter()
                    .filter(|p| p.offset_ms <= visible.progress_ms)
                    .map(|p| Point { x: p.x, y: p.y })
                    .collect();
                Ok(DrawCommand::Stroke {
                    color,
                    width,
                    points,
                })
            }
            ActionKind::Erase => Ok(DrawCommand::Erase {
                region: payload.region.ok_or_else(|| missing("region"))?,
            }),
            ActionKind::Text => Ok(DrawCommand::Text {
                text: payload.text.clone().ok_or_else(|| missing("text"))?,
                position: payload.position.ok_or_else(|| missing("position"))?,
                font: payload.font.clone().ok_or_else(|| missing("font"))?,
            }),
            ActionKind::PageChange => Ok(DrawCommand::PageMarker {
                page: action.page_index,
            }),
            // Clears are folded into the rendered state and never visible.
            ActionKind::ClearPage => Err(missing("visible content")),
        }
    }
}

/// An annotation layer the coordinator draws into.
pub trait Surface {
    /// Switch the surface to display `page`.
    fn show_page(&mut self, page: &Page);

    /// Remove everything drawn on `page`.
    fn clear(&mut self, page: usize);

    fn draw(&mut self, page: usize, command: &DrawCommand);

    /// Give up the underlying drawing target.
    fn release(&mut self);
}

/// The media element playing the session's audio/video.
pub trait VideoSurface {
    fn position_ms(&self) -> u64;

    fn seek_to(&mut self, time_ms: u64);

    fn set_playback(&mut self, status: PlaybackStatus);

    fn release(&mut self);
}

/// Everything the coordinator draws to, acquired together.
pub struct Surfaces {
    /// Finished annotations
    pub permanent: Box<dyn Surface>,
    /// In-progress strokes
    pub volatile: Box<dyn Surface>,
    pub video: Option<Box<dyn VideoSurface>>,
}

impl Surfaces {
    pub fn new(permanent: Box<dyn Surface>, volatile: Box<dyn Surface>) -> Self {
        Self {
            permanent,
            volatile,
            video: None,
        }
    }

    pub fn with_video(mut self, video: Box<dyn VideoSurface>) -> Self {
        self.video = Some(video);
        self
    }

    pub(crate) fn release_all(&mut self) {
        self.permanent.release();
        self.volatile.release();
        if let Some(video) = self.video.as_mut() {
            video.release();
        }
    }
}
