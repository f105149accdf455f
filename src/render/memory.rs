//! In-memory surfaces that record every command they receive.
//!
//! Each surface comes with a log handle sharing its call list, so the
//! surface can be boxed into a coordinator while the caller still
//! inspects what was drawn.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::clock::PlaybackStatus;
use crate::timeline::Page;

use super::surface::{DrawCommand, Surface, VideoSurface};

/// A call received by a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ShowPage(usize),
    Clear(usize),
    Draw(usize, DrawCommand),
    Release,
}

/// Read side of a [`MemorySurface`].
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    calls: Rc<RefCell<Vec<SurfaceCall>>>,
}

impl SurfaceLog {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    /// Drain the recorded calls.
    pub fn take(&self) -> Vec<SurfaceCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Draw(..)))
            .count()
    }

    pub fn current_page(&self) -> Option<usize> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            SurfaceCall::ShowPage(page) => Some(*page),
            _ => None,
        })
    }

    pub fn is_released(&self) -> bool {
        self.calls.borrow().contains(&SurfaceCall::Release)
    }

    /// What each page shows after replaying every call so far.
    pub fn contents(&self) -> BTreeMap<usize, Vec<DrawCommand>> {
        let mut pages: BTreeMap<usize, Vec<DrawCommand>> = BTreeMap::new();
        for call in self.calls.borrow().iter() {
            match call {
                SurfaceCall::Clear(page) => {
                    pages.remove(page);
                }
                SurfaceCall::Draw(page, command) => {
                    pages.entry(*page).or_default().push(command.clone());
                }
                SurfaceCall::Release => pages.clear(),
                SurfaceCall::ShowPage(_) => {}
            }
        }
        pages
    }

    /// Contents of a single page.
    pub fn page_contents(&self, page: usize) -> Vec<DrawCommand> {
        self.contents().remove(&page).unwrap_or_default()
    }
}

/// Surface that appends every call to its [`SurfaceLog`].
#[derive(Debug, Default)]
pub struct MemorySurface {
    log: SurfaceLog,
}

impl MemorySurface {
    pub fn new() -> (Self, SurfaceLog) {
        let surface = Self::default();
        let log = surface.log.clone();
        (surface, log)
    }

    fn push(&self, call: SurfaceCall) {
        self.log.calls.borrow_mut().push(call);
    }
}

impl Surface for MemorySurface {
    fn show_page(&mut self, page: &Page) {
        self.push(SurfaceCall::ShowPage(page.index));
    }

    fn clear(&mut self, page: usize) {
        self.push(SurfaceCall::Clear(page));
    }

    fn draw(&mut self, page: usize, command: &DrawCommand) {
        self.push(SurfaceCall::Draw(page, command.clone()));
    }

    fn release(&mut self) {
        self.push(SurfaceCall::Release);
    }
}

#[derive(Debug, Default)]
struct VideoState {
    position_ms: u64,
    seeks: Vec<u64>,
    playback: Vec<PlaybackStatus>,
    released: bool,
}

/// Read side of a [`MemoryVideo`].
#[derive(Debug, Clone, Default)]
pub struct VideoLog {
    state: Rc<RefCell<VideoState>>,
}

impl VideoLog {
    pub fn position_ms(&self) -> u64 {
        self.state.borrow().position_ms
    }

    /// Move the simulated media position, as if the element played on.
    pub fn set_position(&self, position_ms: u64) {
        self.state.borrow_mut().position_ms = position_ms;
    }

    pub fn seeks(&self) -> Vec<u64> {
        self.state.borrow().seeks.clone()
    }

    pub fn playback(&self) -> Vec<PlaybackStatus> {
        self.state.borrow().playback.clone()
    }

    pub fn is_released(&self) -> bool {
        self.state.borrow().released
    }
}

/// Simulated media element.
#[derive(Debug, Default)]
pub struct MemoryVideo {
    log: VideoLog,
}

impl MemoryVideo {
    pub fn new() -> (Self, VideoLog) {
        let video = Self::default();
        let log = video.log.clone();
        (video, log)
    }
}

impl VideoSurface for MemoryVideo {
    fn position_ms(&self) -> u64 {
        self.log.position_ms()
    }

    fn seek_to(&mut self, time_ms: u64) {
        let mut state = self.log.state.borrow_mut();
        state.position_ms = time_ms;
        state.seeks.push(time_ms);
    }

    fn set_playback(&mut self, status: PlaybackStatus) {
        self.log.state.borrow_mut().playback.push(status);
    }

    fn release(&mut self) {
        self.log.state.borrow_mut().released = true;
    }
}
