//! Print the view at a point in time

use std::path::Path;

use anyhow::{bail, Result};

use strokecast::render::{text::describe, DrawCommand};
use strokecast::timeline::{Tier, VisibleAction};
use strokecast::{Config, Recording, ReplayEngine};

use super::format_ms;

#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path, at: u64, config: &Config) -> Result<()> {
    let recording = Recording::load(file)?;
    let mut engine =
        ReplayEngine::from_recording(recording)?.with_stop_policy(config.playback.stop_policy);
    engine.init()?;
    engine.start()?;
    engine.seek_by_time(at)?;

    let Some(timeline) = engine.timeline() else {
        bail!("Recording has no timeline");
    };
    let visible = engine.rendered().visible(timeline);
    let (text, failures) = report(at, engine.rendered().active_page(), &visible);
    print!("{}", text);

    engine.destroy()?;
    if failures > 0 {
        bail!("{} visible action(s) could not be drawn", failures);
    }
    Ok(())
}

/// List the visible actions as draw commands, returning the text and the
/// number of actions that could not be translated.
pub fn report(at: u64, active_page: Option<usize>, visible: &[VisibleAction<'_>]) -> (String, usize) {
    let mut out = match active_page {
        Some(page) => format!("{} page {}\n", format_ms(at), page),
        None => format!("{} no active page\n", format_ms(at)),
    };
    let mut failures = 0;

    for v in visible {
        let tier = match v.tier {
            Tier::Permanent => "permanent",
            Tier::Volatile => "volatile",
        };
        match DrawCommand::from_visible(v) {
            Ok(command) => out.push_str(&format!("  #{:<4} {:<9} {}\n", v.index, tier, describe(&command))),
            Err(err) => {
                failures += 1;
                out.push_str(&format!("  #{:<4} {:<9} error: {}\n", v.index, tier, err));
            }
        }
    }
    (out, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strokecast::timeline::{Action, ActionKind, ActionTimeline, RenderedState, StrokePoint};

    #[test]
    fn report_marks_in_progress_strokes_volatile() {
        let timeline = ActionTimeline::new(vec![
            Action::page_change(0, 1),
            Action::stroke(
                100,
                1,
                "blue",
                vec![
                    StrokePoint { x: 0.0, y: 0.0, offset_ms: 0 },
                    StrokePoint { x: 1.0, y: 1.0, offset_ms: 400 },
                ],
            ),
        ]);
        let state = RenderedState::at(&timeline, 200);
        let (text, failures) = report(200, state.active_page(), &state.visible(&timeline));

        assert_eq!(failures, 0);
        assert!(text.starts_with("0:00.200 page 1\n"));
        assert!(text.contains("permanent page change -> 1"));
        assert!(text.contains("volatile  stroke blue w=2 (1 pts)"));
    }

    #[test]
    fn report_counts_undrawable_actions() {
        let timeline = ActionTimeline::new(vec![Action::new(0, 1, ActionKind::Erase)]);
        let state = RenderedState::at(&timeline, 10);
        let (text, failures) = report(10, state.active_page(), &state.visible(&timeline));
        assert_eq!(failures, 1);
        assert!(text.contains("has no region"));
    }
}
