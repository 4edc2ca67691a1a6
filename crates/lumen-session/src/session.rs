//! Session data structure
//!
//! An ordered list of tabs plus the index of the active one. Once the first
//! tab is open the list never becomes empty again, and while it is non-empty
//! `active_index < tabs.len()` holds after every operation.
//!
//! Out-of-range indices are not errors here: they are ignored so that a
//! stale click from the UI cannot break anything.

use lumen_navigation::NavigationStatus;
use lumen_tabs::{Tab, TabError, TabId};

use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct Session {
    tabs: Vec<Tab>,
    active_index: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// `None` until the first tab is opened.
    pub fn active_index(&self) -> Option<usize> {
        if self.tabs.is_empty() {
            None
        } else {
            Some(self.active_index)
        }
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active_index)
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == tab_id)
    }

    pub fn index_of(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == tab_id)
    }

    /// Append a tab and make it active.
    pub fn open_tab(&mut self, address: String, placeholder_title: &str) -> TabId {
        let index = self.tabs.len();
        self.insert_tab(index, Tab::new(address, placeholder_title))
    }

    /// Append a tab without changing which tab is active (unless it is the
    /// first one).
    pub fn open_tab_background(&mut self, address: String, placeholder_title: &str) -> TabId {
        let tab = Tab::new(address, placeholder_title);
        let id = tab.id();
        self.tabs.push(tab);
        id
    }

    /// Insert a tab at `index` (clamped to the end) and make it active.
    pub fn insert_tab(&mut self, index: usize, tab: Tab) -> TabId {
        let index = index.min(self.tabs.len());
        let id = tab.id();
        self.tabs.insert(index, tab);
        self.select_tab(index);
        id
    }

    /// Remove the tab at `index`. Ignored when it is the last remaining tab
    /// or the index is out of range.
    pub fn close_tab(&mut self, index: usize) -> Option<Tab> {
        if self.tabs.len() <= 1 || index >= self.tabs.len() {
            tracing::debug!(index, tab_count = self.tabs.len(), "Ignoring close");
            return None;
        }

        let removed = self.tabs.remove(index);
        if self.active_index >= self.tabs.len() {
            self.active_index = self.tabs.len() - 1;
        }

        Some(removed)
    }

    /// Make the tab at `index` active. Out-of-range indices are ignored.
    pub fn select_tab(&mut self, index: usize) {
        match self.tabs.get_mut(index) {
            Some(tab) => {
                tab.touch();
                self.active_index = index;
            }
            None => {
                tracing::debug!(index, tab_count = self.tabs.len(), "Ignoring select");
            }
        }
    }

    /// Move a tab to a new position. The active tab stays active.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tabs.len() {
            return false;
        }

        let active_id = self.current_tab().map(Tab::id);
        let tab = self.tabs.remove(from);
        let to = to.min(self.tabs.len());
        self.tabs.insert(to, tab);

        if let Some(index) = active_id.and_then(|id| self.index_of(id)) {
            self.active_index = index;
        }

        from != to
    }

    /// Apply an engine report to the current tab.
    pub fn apply_status(&mut self, status: &NavigationStatus) -> Option<TabId> {
        let tab = self.tabs.get_mut(self.active_index)?;
        apply(tab, status);
        Some(tab.id())
    }

    /// Apply an engine report to the tab whose surface produced it.
    pub fn apply_status_to(&mut self, tab_id: TabId, status: &NavigationStatus) -> Result<()> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id() == tab_id)
            .ok_or(TabError::NotFound(tab_id))?;
        apply(tab, status);
        Ok(())
    }
}

fn apply(tab: &mut Tab, status: &NavigationStatus) {
    match status {
        NavigationStatus::Started => tab.begin_loading(),
        NavigationStatus::Finished {
            title,
            url,
            can_go_back,
            can_go_forward,
        } => tab.finish_loading(title.clone(), url.clone(), *can_go_back, *can_go_forward),
        NavigationStatus::Failed { error } => {
            tracing::debug!(tab_id = %tab.id(), error = %error, "Navigation failed");
            tab.fail_loading();
        }
    }
}
