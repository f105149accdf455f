//! Subcommand handlers

pub mod completions;
pub mod config;
pub mod inspect;
pub mod play;
pub mod render;

/// Format milliseconds as `m:ss.mmm`.
pub fn format_ms(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}
