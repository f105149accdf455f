//! Recording ingestion.
//!
//! Loads a recorded session (document pages, annotation actions, audio
//! track reference) and validates it before anything is replayed. The
//! JSON layout below is the crate's own interchange format:
//!
//! ```json
//! {
//!   "version": 1,
//!   "title": "Lecture 3",
//!   "recorded_at": 1760400000,
//!   "pages": [{"index": 1}, {"index": 2}],
//!   "audio": {"path": "lecture3.ogg", "duration_ms": 60000},
//!   "actions": [{"t": 0, "page": 1, "kind": "page_change"}]
//! }
//! ```

mod error;

pub use error::IngestionError;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::timeline::{Action, Page};

/// Recording format version understood by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// The media track the annotations were recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub path: String,
    #[serde(default)]
    pub duration_ms: u64,
}

/// On-disk shape; every section is optional so that a missing one can be
/// reported as an ingestion error instead of a parse error.
#[derive(Debug, Deserialize)]
struct RecordingFile {
    version: u32,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    recorded_at: Option<i64>,
    #[serde(default)]
    pages: Option<Vec<Page>>,
    #[serde(default)]
    actions: Option<Vec<Action>>,
    #[serde(default)]
    audio: Option<AudioTrack>,
}

/// A complete recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Unix timestamp (seconds) of the recording start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<i64>,
    pub pages: Vec<Page>,
    pub actions: Vec<Action>,
    pub audio: Option<AudioTrack>,
}

impl Recording {
    pub fn new(pages: Vec<Page>, actions: Vec<Action>, audio: AudioTrack) -> Self {
        Self {
            version: FORMAT_VERSION,
            title: None,
            recorded_at: None,
            pages,
            actions,
            audio: Some(audio),
        }
    }

    /// Load and validate a recording file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        Self::parse_str(&content).with_context(|| format!("Failed to load recording: {:?}", path))
    }

    /// Parse and validate a recording from JSON text.
    pub fn parse_str(content: &str) -> Result<Self> {
        let file: RecordingFile =
            serde_json::from_str(content).context("Failed to parse recording JSON")?;

        if file.version != FORMAT_VERSION {
            return Err(IngestionError::UnsupportedVersion(file.version).into());
        }

        let recording = Recording {
            version: file.version,
            title: file.title,
            recorded_at: file.recorded_at,
            pages: file.pages.ok_or(IngestionError::MissingPages)?,
            actions: file.actions.ok_or(IngestionError::MissingActions)?,
            audio: file.audio,
        };
        recording.validate()?;
        Ok(recording)
    }

    /// Check that the recording is complete and self-consistent.
    ///
    /// An empty action list is valid; missing pages or audio are not.
    pub fn validate(&self) -> Result<(), IngestionError> {
        if self.version != FORMAT_VERSION {
            return Err(IngestionError::UnsupportedVersion(self.version));
        }
        if self.pages.is_empty() {
            return Err(IngestionError::MissingPages);
        }
        if self.audio.is_none() {
            return Err(IngestionError::MissingAudio);
        }

        let mut known = HashSet::with_capacity(self.pages.len());
        for page in &self.pages {
            if !known.insert(page.index) {
                return Err(IngestionError::DuplicatePage { index: page.index });
            }
        }

        if let Some(action) = self.actions.iter().find(|a| !known.contains(&a.page_index)) {
            return Err(IngestionError::UnknownPage {
                page: action.page_index,
                timestamp_ms: action.timestamp_ms,
            });
        }

        Ok(())
    }

    /// Length of the session: the audio track or the last action,
    /// whichever runs longer.
    pub fn duration_ms(&self) -> u64 {
        let audio = self.audio.as_ref().map(|a| a.duration_ms).unwrap_or(0);
        let actions = self
            .actions
            .iter()
            .map(Action::completes_at_ms)
            .max()
            .unwrap_or(0);
        audio.max(actions)
    }

    /// Recording start as a UTC date-time, if known.
    pub fn recorded_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.recorded_at
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize recording")
    }
}
