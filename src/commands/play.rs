//! Simulated playback

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use strokecast::lifecycle::Stateful;
use strokecast::render::{Surfaces, TextSurface};
use strokecast::{ClockEvent, ClockSource, Config, ManualClock, PlaybackStatus, PlayerSession, Recording};

use super::format_ms;

/// Play `file` against a [`ManualClock`] ticking in real time, printing
/// every surface call. Ctrl+C pauses and tears the session down.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    file: &Path,
    config: &Config,
    speed: Option<f64>,
    tick_ms: Option<u64>,
    from: Option<u64>,
) -> Result<()> {
    let speed = speed.unwrap_or(config.playback.speed);
    let tick_ms = tick_ms.unwrap_or(config.playback.tick_ms);
    if !(speed.is_finite() && speed > 0.0) {
        bail!("Speed must be a positive number, got {}", speed);
    }
    if tick_ms == 0 {
        bail!("Tick interval must be at least 1ms");
    }
    let interval = tick_interval(tick_ms, speed)?;

    let recording = Recording::load(file)?;
    let duration_ms = recording.duration_ms();
    let mut session = PlayerSession::mount(recording, &config.playback)?;
    let _states = session.subscribe(|state| tracing::info!(%state, "engine state"));

    session.attach_surfaces(Surfaces::new(
        Box::new(TextSurface::stdout("permanent")),
        Box::new(TextSurface::stdout("volatile")),
    ))?;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))
        .context("Failed to install Ctrl+C handler")?;

    let mut clock = ManualClock::new();

    if let Some(from) = from {
        for event in clock.seek(from.min(duration_ms)) {
            session.handle(&clock, event);
        }
    }
    let event = clock.set_playback(PlaybackStatus::Playing);
    emit(&mut session, &clock, event);

    while running.load(Ordering::SeqCst) && !session.engine().is_error() {
        let now = clock.current_time_ms();
        if now >= duration_ms {
            let event = clock.set_playback(PlaybackStatus::Ended);
            emit(&mut session, &clock, event);
            break;
        }
        thread::sleep(interval);
        let event = clock.set_time(now.saturating_add(tick_ms).min(duration_ms));
        emit(&mut session, &clock, event);
    }

    if !running.load(Ordering::SeqCst) {
        let event = clock.set_playback(PlaybackStatus::Paused);
        emit(&mut session, &clock, event);
    }

    let failed = session.engine().is_error();
    let position = session.engine().position_ms();
    session.unmount();

    if failed {
        bail!("Playback failed at {}", format_ms(position));
    }
    eprintln!("Stopped at {}", format_ms(position));
    Ok(())
}

fn emit(session: &mut PlayerSession, clock: &ManualClock, event: Option<ClockEvent>) {
    if let Some(event) = event {
        session.handle(clock, event);
    }
}

/// Wall-clock time between ticks of `tick_ms` media time at `speed`.
fn tick_interval(tick_ms: u64, speed: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(tick_ms as f64 / 1000.0 / speed) {
        Ok(interval) => Ok(interval),
        Err(_) => bail!("Tick interval of {}ms is too long at speed {}", tick_ms, speed),
    }
}
