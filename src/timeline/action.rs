//! Recorded actions and their payloads.

use serde::{Deserialize, Serialize};

/// What an action does to its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Freehand stroke, drawn point by point
    Stroke,
    /// Erase a rectangular region
    Erase,
    /// Place a text label
    Text,
    /// Wipe every earlier annotation on the page
    ClearPage,
    /// Make the action's page the active page
    PageChange,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Stroke => "stroke",
            ActionKind::Erase => "erase",
            ActionKind::Text => "text",
            ActionKind::ClearPage => "clear_page",
            ActionKind::PageChange => "page_change",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A 2D position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// One sampled point of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
    /// Milliseconds after the owning action's timestamp
    #[serde(default)]
    pub offset_ms: u64,
}

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Font used by text actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f32,
}

/// Rendering attributes attached to an action.
///
/// The timeline never looks inside; only the render coordinator checks
/// that the attributes its draw call needs are present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<StrokePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Rect>,
}

/// A timestamped, page-scoped drawing or annotation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Milliseconds since recording start
    #[serde(rename = "t")]
    pub timestamp_ms: u64,
    #[serde(rename = "page")]
    pub page_index: usize,
    pub kind: ActionKind,
    #[serde(default)]
    pub payload: Payload,
}

impl Action {
    pub fn new(timestamp_ms: u64, page_index: usize, kind: ActionKind) -> Self {
        Self {
            timestamp_ms,
            page_index,
            kind,
            payload: Payload::default(),
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// A stroke with the given color, width and points.
    pub fn stroke(timestamp_ms: u64, page_index: usize, color: &str, points: Vec<StrokePoint>) -> Self {
        Self::new(timestamp_ms, page_index, ActionKind::Stroke).with_payload(Payload {
            points,
            color: Some(color.to_string()),
            width: Some(2.0),
            ..Payload::default()
        })
    }

    pub fn page_change(timestamp_ms: u64, page_index: usize) -> Self {
        Self::new(timestamp_ms, page_index, ActionKind::PageChange)
    }

    pub fn is_page_change(&self) -> bool {
        self.kind == ActionKind::PageChange
    }

    /// How long the action keeps drawing after its timestamp.
    ///
    /// Only strokes have a duration: the offset of their last point.
    pub fn duration_ms(&self) -> u64 {
        match self.kind {
            ActionKind::Stroke => self
                .payload
                .points
                .iter()
                .map(|p| p.offset_ms)
                .max()
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Time at which the action is fully drawn.
    pub fn completes_at_ms(&self) -> u64 {
        self.timestamp_ms.saturating_add(self.duration_ms())
    }

    /// Whether the action is still being drawn at `time_ms`.
    pub fn in_progress_at(&self, time_ms: u64) -> bool {
        time_ms >= self.timestamp_ms && time_ms < self.completes_at_ms()
    }
}
