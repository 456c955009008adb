//! Per-tab match counts behind the badge
//!
//! For every open tab the tracker knows how many active registrations match
//! its URL. Counts are recomputed on load completion, URL change, and after
//! every synchronization; they are published as badge text and dropped when
//! the tab closes.
//!
//! A navigation bumps the tab's generation counter. A publish carries the
//! generation it was computed for and is discarded if the tab has navigated
//! since, so a slow computation for a superseded URL can never overwrite a
//! newer result: last-write-wins by tab, not by completion time.

use crate::host::{HostError, TabApi, TabId, TabInfo};
use crate::matcher::count_matching;
use crate::models::RegisteredScript;
use std::collections::HashMap;

pub type Generation = u64;

pub struct TabMatchTracker {
    counts: HashMap<TabId, usize>,
    generations: HashMap<TabId, Generation>,
}

impl TabMatchTracker {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            generations: HashMap::new(),
        }
    }

    /// The most recently published count for a tab, if any.
    pub fn count_for(&self, tab: TabId) -> Option<usize> {
        self.counts.get(&tab).copied()
    }

    /// Record that a tab started navigating. Returns the generation a
    /// subsequent publish must carry to be accepted.
    pub fn begin_navigation(&mut self, tab: TabId) -> Generation {
        let generation = self.generations.entry(tab).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Publish a computed count. Returns false (and changes nothing) when
    /// the tab has navigated past `generation`.
    pub fn publish(
        &mut self,
        tab: TabId,
        generation: Generation,
        count: usize,
        tabs: &dyn TabApi,
    ) -> Result<bool, HostError> {
        if self.generations.get(&tab).copied() != Some(generation) {
            log::debug!("discarding stale count for tab {}", tab);
            return Ok(false);
        }
        self.counts.insert(tab, count);
        tabs.set_badge_text(tab, &badge_text(count))?;
        Ok(true)
    }

    /// Compute and publish the count for a tab's resolved URL.
    pub fn refresh_tab(
        &mut self,
        tab: TabId,
        url: &str,
        registered: &[RegisteredScript],
        tabs: &dyn TabApi,
    ) -> Result<usize, HostError> {
        let generation = self.begin_navigation(tab);
        let count = count_matching(registered, url);
        self.publish(tab, generation, count, tabs)?;
        Ok(count)
    }

    /// Recompute every open tab with a resolved URL and drop state for tabs
    /// that are no longer open.
    pub fn refresh_all(
        &mut self,
        open_tabs: &[TabInfo],
        registered: &[RegisteredScript],
        tabs: &dyn TabApi,
    ) -> Result<(), HostError> {
        let open: Vec<TabId> = open_tabs.iter().map(|t| t.id).collect();
        let stale: Vec<TabId> = self
            .counts
            .keys()
            .copied()
            .filter(|id| !open.contains(id))
            .collect();
        for tab in stale {
            self.remove_tab(tab, tabs)?;
        }

        for tab in open_tabs {
            if let Some(url) = &tab.url {
                self.refresh_tab(tab.id, url, registered, tabs)?;
            }
        }
        Ok(())
    }

    /// Re-publish the last known count, e.g. when a tab is activated and the
    /// badge should reflect it again.
    pub fn republish(&mut self, tab: TabId, tabs: &dyn TabApi) -> Result<(), HostError> {
        if let Some(count) = self.count_for(tab) {
            tabs.set_badge_text(tab, &badge_text(count))?;
        }
        Ok(())
    }

    /// Forget a closed tab and clear its badge.
    pub fn remove_tab(&mut self, tab: TabId, tabs: &dyn TabApi) -> Result<(), HostError> {
        self.counts.remove(&tab);
        self.generations.remove(&tab);
        tabs.set_badge_text(tab, "")?;
        Ok(())
    }
}

impl Default for TabMatchTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn badge_text(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        count.to_string()
    }
}
