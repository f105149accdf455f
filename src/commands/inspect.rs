//! Recording summary

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};

use strokecast::Recording;

use super::format_ms;

#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path) -> Result<()> {
    let size = fs::metadata(file)
        .with_context(|| format!("Failed to open file: {:?}", file))?
        .len();
    let recording = Recording::load(file)?;
    print!("{}", summary(&recording, size));
    Ok(())
}

/// Human-readable summary of a loaded recording.
pub fn summary(recording: &Recording, file_size: u64) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for action in &recording.actions {
        *counts.entry(action.kind.name()).or_default() += 1;
    }
    let breakdown = counts
        .iter()
        .map(|(kind, n)| format!("{} {}", kind, n))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    let title = recording.title.as_deref().unwrap_or("(untitled)");
    out.push_str(&format!("Title:     {}\n", title));
    if let Some(date) = recording.recorded_at_utc() {
        out.push_str(&format!("Recorded:  {}\n", date.format("%Y-%m-%d %H:%M UTC")));
    }
    out.push_str(&format!("File size: {}\n", format_size(file_size, BINARY)));
    out.push_str(&format!("Pages:     {}\n", recording.pages.len()));
    if breakdown.is_empty() {
        out.push_str("Actions:   0\n");
    } else {
        out.push_str(&format!(
            "Actions:   {} ({})\n",
            recording.actions.len(),
            breakdown
        ));
    }
    out.push_str(&format!("Duration:  {}\n", format_ms(recording.duration_ms())));
    if let Some(audio) = &recording.audio {
        out.push_str(&format!(
            "Audio:     {} ({})\n",
            audio.path,
            format_ms(audio.duration_ms)
        ));
    }
    out
}
