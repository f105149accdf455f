//! End-to-end replay of the lecture fixture through a player session

use std::cell::RefCell;
use std::rc::Rc;

use super::helpers::fixtures_dir;
use strokecast::config::PlaybackConfig;
use strokecast::render::{DrawCommand, MemorySurface, MemoryVideo, SurfaceLog, VideoLog};
use strokecast::timeline::Tier;
use strokecast::{
    ClockEvent, ClockSource, LifecycleState, ManualClock, PlaybackStatus, PlayerSession, Recording,
    RenderedState, ReplayEngine, Stateful, StopPolicy, Surfaces,
};

fn lecture() -> Recording {
    Recording::load(fixtures_dir().join("lecture.json")).unwrap()
}

struct Player {
    session: PlayerSession,
    clock: ManualClock,
    permanent: SurfaceLog,
    volatile: SurfaceLog,
    video: VideoLog,
}

impl Player {
    fn mount(config: PlaybackConfig) -> Self {
        let mut session = PlayerSession::mount(lecture(), &config).unwrap();
        let (permanent, permanent_log) = MemorySurface::new();
        let (volatile, volatile_log) = MemorySurface::new();
        let (video, video_log) = MemoryVideo::new();
        session
            .attach_surfaces(
                Surfaces::new(Box::new(permanent), Box::new(volatile)).with_video(Box::new(video)),
            )
            .unwrap();
        Self {
            session,
            clock: ManualClock::new(),
            permanent: permanent_log,
            volatile: volatile_log,
            video: video_log,
        }
    }

    fn send(&mut self, event: Option<ClockEvent>) {
        if let Some(event) = event {
            self.session.handle(&self.clock, event);
        }
    }

    fn set_playback(&mut self, status: PlaybackStatus) {
        let event = self.clock.set_playback(status);
        self.send(event);
    }

    fn play_until(&mut self, time_ms: u64, tick_ms: u64) {
        while self.clock.current_time_ms() < time_ms {
            let next = (self.clock.current_time_ms() + tick_ms).min(time_ms);
            let event = self.clock.set_time(next);
            self.send(event);
        }
    }

    /// A user seek: the time update arrives while the clock reports seeking.
    fn seek(&mut self, time_ms: u64) {
        let event = self.clock.set_seeking(true);
        self.send(event);
        let event = self.clock.set_time(time_ms);
        self.send(event);
        let event = self.clock.set_seeking(false);
        self.send(event);
    }
}

#[test]
fn playing_through_the_lecture_matches_seeking() {
    let mut player = Player::mount(PlaybackConfig::default());
    player.set_playback(PlaybackStatus::Playing);

    for checkpoint in [300, 1600, 2300, 3100, 3250, 4500] {
        player.play_until(checkpoint, 40);
        let engine = player.session.engine();
        let expected = RenderedState::at(engine.timeline().unwrap(), checkpoint);
        assert_eq!(engine.rendered(), &expected, "diverged at {}ms", checkpoint);
    }
}

#[test]
fn stroke_in_progress_is_drawn_on_volatile_surface() {
    let mut player = Player::mount(PlaybackConfig::default());
    player.set_playback(PlaybackStatus::Playing);
    player.play_until(300, 50);

    let volatile = player.volatile.page_contents(1);
    assert_eq!(volatile.len(), 1);
    let DrawCommand::Stroke { points, color, .. } = &volatile[0] else {
        panic!("expected a stroke, got {:?}", volatile[0]);
    };
    assert_eq!(color, "red");
    assert_eq!(points.len(), 2);

    player.play_until(600, 50);
    assert!(player.volatile.page_contents(1).is_empty());
    assert_eq!(player.permanent.page_contents(1).len(), 2);
}

#[test]
fn page_change_and_clear_follow_the_clock() {
    let mut player = Player::mount(PlaybackConfig::default());
    player.set_playback(PlaybackStatus::Playing);

    player.play_until(2600, 100);
    assert_eq!(player.permanent.current_page(), Some(2));
    assert_eq!(player.permanent.page_contents(2).len(), 2);
    assert!(player.permanent.page_contents(1).is_empty());

    player.play_until(3100, 100);
    assert!(player.session.engine().rendered().is_empty());
    assert!(player.permanent.page_contents(2).is_empty());

    player.play_until(4500, 100);
    assert_eq!(player.permanent.current_page(), Some(1));
    assert_eq!(player.permanent.page_contents(1).len(), 5);
}

#[test]
fn seeking_backward_restores_earlier_view() {
    let mut player = Player::mount(PlaybackConfig::default());
    player.set_playback(PlaybackStatus::Playing);
    player.play_until(4500, 250);

    player.seek(1600);
    let engine = player.session.engine();
    assert_eq!(engine.rendered().active_page(), Some(1));
    assert_eq!(engine.rendered().visible_indices(), &[0, 1, 2, 3]);
    assert_eq!(player.permanent.page_contents(1).len(), 4);
    assert_eq!(player.video.seeks().last(), Some(&1600));
}

#[test]
fn history_does_not_change_the_seek_result() {
    let mut a = Player::mount(PlaybackConfig::default());
    a.set_playback(PlaybackStatus::Playing);
    a.seek(5000);
    a.seek(2300);

    let mut b = Player::mount(PlaybackConfig::default());
    b.set_playback(PlaybackStatus::Playing);
    b.seek(100);
    b.seek(2300);

    assert_eq!(a.session.engine().rendered(), b.session.engine().rendered());
    let timeline = a.session.engine().timeline().unwrap();
    let tiers: Vec<Tier> = a
        .session
        .engine()
        .rendered()
        .visible(timeline)
        .iter()
        .map(|v| v.tier)
        .collect();
    assert_eq!(tiers, vec![Tier::Permanent, Tier::Volatile]);
}

#[test]
fn pause_and_resume_keep_position() {
    let mut player = Player::mount(PlaybackConfig::default());
    player.set_playback(PlaybackStatus::Playing);
    player.play_until(1000, 100);
    player.set_playback(PlaybackStatus::Paused);
    assert!(player.session.engine().is_suspended());

    player.play_until(1500, 100);
    assert_eq!(player.session.engine().position_ms(), 1000);

    player.set_playback(PlaybackStatus::Playing);
    assert_eq!(player.session.engine().position_ms(), 1500);
    assert_eq!(
        player.video.playback(),
        vec![
            PlaybackStatus::Playing,
            PlaybackStatus::Paused,
            PlaybackStatus::Playing
        ]
    );
}

#[test]
fn ended_with_clear_policy_empties_the_view() {
    let config = PlaybackConfig {
        stop_policy: StopPolicy::Clear,
        ..PlaybackConfig::default()
    };
    let mut player = Player::mount(config);
    player.set_playback(PlaybackStatus::Playing);
    player.play_until(6000, 500);
    player.set_playback(PlaybackStatus::Ended);

    assert!(player.session.engine().is_stopped());
    assert!(player.session.engine().rendered().is_empty());
}

#[test]
fn ended_with_finalize_policy_keeps_finished_annotations() {
    let mut player = Player::mount(PlaybackConfig::default());
    player.set_playback(PlaybackStatus::Playing);
    player.play_until(2300, 100);
    player.set_playback(PlaybackStatus::Ended);

    let engine = player.session.engine();
    assert!(engine.is_stopped());
    assert_eq!(engine.rendered().visible_indices(), &[4]);
    assert!(player.volatile.page_contents(2).is_empty());
}

#[test]
fn render_failure_moves_engine_to_error() {
    let recording = Recording::load(fixtures_dir().join("text_without_font.json")).unwrap();
    let mut session = PlayerSession::mount(recording, &PlaybackConfig::default()).unwrap();
    let (permanent, log) = MemorySurface::new();
    let (volatile, _) = MemorySurface::new();
    session
        .attach_surfaces(Surfaces::new(Box::new(permanent), Box::new(volatile)))
        .unwrap();

    let states = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&states);
    let _sub = session.subscribe(move |state| s.borrow_mut().push(state));

    let mut clock = ManualClock::new();
    for event in [
        clock.set_playback(PlaybackStatus::Playing),
        clock.set_time(500),
    ]
    .into_iter()
    .flatten()
    {
        session.handle(&clock, event);
    }

    assert!(session.engine().is_error());
    assert_eq!(states.borrow().last(), Some(&LifecycleState::Error));
    assert_eq!(log.page_contents(1).len(), 1);

    // start is accepted from error, but the same action fails again on redraw
    session.start().unwrap();
    assert!(session.engine().is_error());

    session.stop().unwrap();
    assert!(session.engine().is_stopped());
}

#[test]
fn unmount_releases_every_surface() {
    let mut player = Player::mount(PlaybackConfig::default());
    player.set_playback(PlaybackStatus::Playing);
    player.play_until(500, 100);

    let Player {
        session,
        permanent,
        volatile,
        video,
        ..
    } = player;
    session.unmount();

    assert!(permanent.is_released());
    assert!(volatile.is_released());
    assert!(video.is_released());
}

#[test]
fn engine_without_session_replays_directly() {
    let mut engine = ReplayEngine::from_recording(lecture()).unwrap();
    engine.init().unwrap();
    engine.start().unwrap();
    engine.seek_by_time(3250).unwrap();
    assert_eq!(engine.rendered().visible_indices(), &[7]);
    assert_eq!(engine.active_page().and_then(|p| p.background), Some("slides/p2.png".to_string()));
}
