//! Integration tests for recording ingestion

use std::fs;

use super::helpers::{fixtures_dir, load_fixture, temp_fixture};
use strokecast::timeline::ActionKind;
use strokecast::{IngestionError, Recording};

fn ingestion_error(name: &str) -> IngestionError {
    Recording::load(fixtures_dir().join(name))
        .unwrap_err()
        .downcast::<IngestionError>()
        .expect("expected an ingestion error")
}

#[test]
fn lecture_fixture_loads() {
    let recording = Recording::load(fixtures_dir().join("lecture.json")).unwrap();
    assert_eq!(recording.title.as_deref(), Some("Linear maps, part 2"));
    assert_eq!(recording.pages.len(), 3);
    assert_eq!(recording.actions.len(), 9);
    assert_eq!(recording.duration_ms(), 6000);
    assert_eq!(
        recording.pages[0].background.as_deref(),
        Some("slides/p1.png")
    );
}

#[test]
fn recorded_at_is_utc() {
    let recording = Recording::load(fixtures_dir().join("lecture.json")).unwrap();
    let date = recording.recorded_at_utc().unwrap();
    assert_eq!(date.format("%Y-%m-%d").to_string(), "2025-10-14");
}

#[test]
fn missing_audio_is_rejected() {
    assert_eq!(ingestion_error("missing_audio.json"), IngestionError::MissingAudio);
}

#[test]
fn action_on_unknown_page_is_rejected() {
    assert_eq!(
        ingestion_error("unknown_page.json"),
        IngestionError::UnknownPage {
            page: 7,
            timestamp_ms: 250
        }
    );
}

#[test]
fn missing_render_attributes_are_not_an_ingestion_error() {
    let recording = Recording::load(fixtures_dir().join("text_without_font.json")).unwrap();
    assert_eq!(recording.actions[1].kind, ActionKind::Text);
    assert!(recording.actions[1].payload.font.is_none());
}

#[test]
fn missing_file_reports_path() {
    let err = Recording::load("/nonexistent/lecture.json").unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to open file"));
}

#[test]
fn json_round_trip_preserves_timeline() {
    let (_dir, path) = temp_fixture("lecture.json");
    let original = Recording::load(&path).unwrap();

    fs::write(&path, original.to_json().unwrap()).unwrap();
    let reloaded = Recording::load(&path).unwrap();

    assert_eq!(reloaded, original);
}

#[test]
fn unsupported_version_is_rejected() {
    let content = load_fixture("lecture.json").replacen("\"version\": 1", "\"version\": 9", 1);
    let err = Recording::parse_str(&content)
        .unwrap_err()
        .downcast::<IngestionError>()
        .unwrap();
    assert_eq!(err, IngestionError::UnsupportedVersion(9));
    assert_eq!(err.to_string(), "Unsupported recording version 9 (expected 1)");
}
