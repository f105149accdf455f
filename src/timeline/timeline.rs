//! The ordered, page-partitioned action collection.

use std::collections::BTreeMap;

use super::action::Action;
use super::page::PageSource;

/// Every recorded action of a session in application order.
///
/// Actions are ordered by timestamp. Ties keep their source order, except
/// that page changes move ahead of same-time drawing actions so the right
/// page is active before its strokes land.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionTimeline {
    actions: Vec<Action>,
    by_page: BTreeMap<usize, Vec<usize>>,
}

impl ActionTimeline {
    pub fn new(mut actions: Vec<Action>) -> Self {
        // sort_by_key is stable
        actions.sort_by_key(|a| (a.timestamp_ms, !a.is_page_change()));

        let mut by_page: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, action) in actions.iter().enumerate() {
            by_page.entry(action.page_index).or_default().push(i);
        }

        Self { actions, by_page }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    /// Page indices that have at least one action, ascending.
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_page.keys().copied()
    }

    /// Actions recorded on `page`, in application order.
    pub fn actions_on_page(&self, page: usize) -> impl Iterator<Item = &Action> + '_ {
        self.by_page
            .get(&page)
            .into_iter()
            .flatten()
            .map(move |&i| &self.actions[i])
    }

    /// Number of actions with a timestamp at or before `time_ms`.
    pub fn count_at(&self, time_ms: u64) -> usize {
        self.actions.partition_point(|a| a.timestamp_ms <= time_ms)
    }

    /// Time at which the last action finishes drawing.
    pub fn duration_ms(&self) -> u64 {
        self.actions
            .iter()
            .map(Action::completes_at_ms)
            .max()
            .unwrap_or(0)
    }

    /// Referenced pages the source cannot provide.
    pub fn missing_pages(&self, source: &dyn PageSource) -> Vec<usize> {
        self.pages().filter(|&p| source.page(p).is_none()).collect()
    }
}
