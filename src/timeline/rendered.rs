//! The visible state of a timeline at a point in time.

use std::collections::BTreeMap;

use super::action::{Action, ActionKind};
use super::timeline::ActionTimeline;

/// Permanence tier of a visible action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Fully drawn
    Permanent,
    /// Still being drawn at the current time
    Volatile,
}

/// An action visible at the rendered time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleAction<'a> {
    /// Position in the timeline
    pub index: usize,
    pub action: &'a Action,
    pub tier: Tier,
    /// Milliseconds of the action drawn so far
    pub progress_ms: u64,
}

/// Which actions are on screen at `time_ms`.
///
/// The state holds timeline indices, folded in timeline order. The fold
/// over the first `n` actions is the same whether it runs in one call or
/// in increments, so forward playback and a direct seek agree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedState {
    time_ms: u64,
    applied: usize,
    active_page: Option<usize>,
    layers: BTreeMap<usize, Vec<usize>>,
}

impl RenderedState {
    /// Recompute the state for `time_ms` from scratch.
    pub fn at(timeline: &ActionTimeline, time_ms: u64) -> Self {
        let mut state = Self::default();
        state.apply_until(timeline, time_ms);
        state
    }

    /// Move forward to `time_ms`, applying only the actions not yet seen.
    ///
    /// Moving backward falls back to a full recompute.
    pub fn advance(&mut self, timeline: &ActionTimeline, time_ms: u64) {
        if time_ms < self.time_ms || self.applied > timeline.len() {
            *self = Self::at(timeline, time_ms);
        } else {
            self.apply_until(timeline, time_ms);
        }
    }

    fn apply_until(&mut self, timeline: &ActionTimeline, time_ms: u64) {
        let end = timeline.count_at(time_ms);
        for index in self.applied..end {
            self.apply(index, &timeline.actions()[index]);
        }
        self.applied = end;
        self.time_ms = time_ms;
    }

    fn apply(&mut self, index: usize, action: &Action) {
        let page = action.page_index;
        match action.kind {
            ActionKind::PageChange => {
                self.active_page = Some(page);
                self.layers.entry(page).or_default().push(index);
            }
            ActionKind::ClearPage => {
                self.active_page.get_or_insert(page);
                self.layers.entry(page).or_default().clear();
            }
            ActionKind::Stroke | ActionKind::Erase | ActionKind::Text => {
                self.active_page.get_or_insert(page);
                self.layers.entry(page).or_default().push(index);
            }
        }
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Number of timeline actions folded into this state.
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn active_page(&self) -> Option<usize> {
        self.active_page
    }

    /// Timeline indices on `page`, in application order.
    pub fn page_entries(&self, page: usize) -> &[usize] {
        self.layers.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Timeline indices on the active page.
    pub fn visible_indices(&self) -> &[usize] {
        match self.active_page {
            Some(page) => self.page_entries(page),
            None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.visible_indices().is_empty()
    }

    /// Actions on the active page with their tier at the rendered time.
    pub fn visible<'a>(&self, timeline: &'a ActionTimeline) -> Vec<VisibleAction<'a>> {
        self.visible_indices()
            .iter()
            .filter_map(|&index| {
                let action = timeline.get(index)?;
                let tier = if action.in_progress_at(self.time_ms) {
                    Tier::Volatile
                } else {
                    Tier::Permanent
                };
                Some(VisibleAction {
                    index,
                    action,
                    tier,
                    progress_ms: self.time_ms.saturating_sub(action.timestamp_ms),
                })
            })
            .collect()
    }

    /// Visible actions in `tier` only.
    pub fn tier<'a>(&self, timeline: &'a ActionTimeline, tier: Tier) -> Vec<VisibleAction<'a>> {
        self.visible(timeline)
            .into_iter()
            .filter(|v| v.tier == tier)
            .collect()
    }

    /// Drop every in-progress stroke, keeping what is fully drawn.
    pub(crate) fn discard_volatile(&mut self, timeline: &ActionTimeline) {
        let time_ms = self.time_ms;
        for entries in self.layers.values_mut() {
            entries.retain(|&i| {
                timeline
                    .get(i)
                    .map(|a| !a.in_progress_at(time_ms))
                    .unwrap_or(false)
            });
        }
    }
}
