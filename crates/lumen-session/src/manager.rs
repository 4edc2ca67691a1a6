//! Session Store
//!
//! Owns the session, remembers recently closed tabs and tells subscribers
//! whenever something they display has changed. All methods run on the UI
//! sequence; there is no locking.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use lumen_navigation::NavigationStatus;
use lumen_tabs::{Tab, TabId};

use crate::error::SessionError;
use crate::session::Session;
use crate::Result;

/// Change notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Tabs were added, removed or reordered
    TabsChanged,
    /// A different tab is now current
    ActiveTabChanged { index: usize, tab_id: TabId },
    /// A tab's fields were updated from an engine report
    TabUpdated { tab_id: TabId },
    /// The engine could not complete a navigation
    NavigationFailed { tab_id: TabId, error: String },
}

#[derive(Debug, Clone)]
struct ClosedTab {
    url: String,
    title: String,
    index: usize,
    closed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Title shown before a tab's first load completes
    pub placeholder_title: String,
    /// How many closed tabs can be restored
    pub closed_tab_limit: usize,
    /// Buffered events per subscriber before the slowest one starts lagging
    pub event_capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            placeholder_title: "New Tab".to_string(),
            closed_tab_limit: 20,
            event_capacity: 1024,
        }
    }
}

pub struct SessionStore {
    session: Session,
    placeholder_title: String,
    recently_closed: Vec<ClosedTab>,
    closed_tab_limit: usize,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(options: StoreOptions) -> Self {
        let (events, _) = broadcast::channel(options.event_capacity.max(1));

        Self {
            session: Session::new(),
            placeholder_title: options.placeholder_title,
            recently_closed: Vec::new(),
            closed_tab_limit: options.closed_tab_limit,
            events,
        }
    }

    /// Receive change notifications from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tabs(&self) -> &[Tab] {
        self.session.tabs()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.session.active_index()
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.session.current_tab()
    }

    /// Open a tab at the end of the list and make it current.
    pub fn open_tab(&mut self, address: impl Into<String>) -> TabId {
        let address = address.into();
        let tab_id = self.session.open_tab(address.clone(), &self.placeholder_title);

        tracing::info!(tab_id = %tab_id, url = %address, "Opened tab");

        self.publish(SessionEvent::TabsChanged);
        self.publish_active();
        tab_id
    }

    /// Open a tab at the end of the list, leaving the current tab alone.
    pub fn open_tab_background(&mut self, address: impl Into<String>) -> TabId {
        let address = address.into();
        let was_empty = self.session.is_empty();
        let tab_id = self
            .session
            .open_tab_background(address.clone(), &self.placeholder_title);

        tracing::info!(tab_id = %tab_id, url = %address, "Opened background tab");

        self.publish(SessionEvent::TabsChanged);
        if was_empty {
            self.publish_active();
        }
        tab_id
    }

    /// Close the tab at `index`, remembering it for restore. Returns the id of
    /// the closed tab, or `None` when the close was ignored.
    pub fn close_tab(&mut self, index: usize) -> Option<TabId> {
        let previous = self.current_id();
        let tab = self.session.close_tab(index)?;

        self.recently_closed.push(ClosedTab {
            url: tab.url.clone(),
            title: tab.title.clone(),
            index,
            closed_at: Utc::now(),
        });

        if self.recently_closed.len() > self.closed_tab_limit {
            let overflow = self.recently_closed.len() - self.closed_tab_limit;
            self.recently_closed.drain(0..overflow);
        }

        tracing::info!(tab_id = %tab.id(), index, "Closed tab");

        self.publish(SessionEvent::TabsChanged);
        if self.current_id() != previous {
            self.publish_active();
        }
        Some(tab.id())
    }

    /// Make the tab at `index` current. Out-of-range indices are ignored.
    pub fn select_tab(&mut self, index: usize) {
        let previous = self.current_id();
        self.session.select_tab(index);

        if self.current_id() != previous {
            self.publish_active();
        }
    }

    /// Move a tab; the current tab stays current. Its index may change, in
    /// which case the new index is announced.
    pub fn move_tab(&mut self, from: usize, to: usize) {
        let previous = self.session.active_index();

        if self.session.move_tab(from, to) {
            tracing::debug!(from, to, "Moved tab");
            self.publish(SessionEvent::TabsChanged);
            if self.session.active_index() != previous {
                self.publish_active();
            }
        }
    }

    /// Reopen the most recently closed tab at its former position.
    pub fn restore_last_closed(&mut self) -> Result<TabId> {
        let closed = self
            .recently_closed
            .pop()
            .ok_or(SessionError::NothingToRestore)?;

        let tab = Tab::new(closed.url, closed.title);
        let tab_id = self.session.insert_tab(closed.index, tab);

        tracing::info!(
            tab_id = %tab_id,
            index = closed.index,
            closed_at = %closed.closed_at.to_rfc3339(),
            "Restored closed tab"
        );

        self.publish(SessionEvent::TabsChanged);
        self.publish_active();
        Ok(tab_id)
    }

    pub fn recently_closed_count(&self) -> usize {
        self.recently_closed.len()
    }

    /// Apply an engine report to the current tab.
    pub fn apply_status(&mut self, status: &NavigationStatus) {
        if let Some(tab_id) = self.session.apply_status(status) {
            self.publish_status(tab_id, status);
        }
    }

    /// Apply an engine report to the tab that produced it.
    pub fn apply_status_to(&mut self, tab_id: TabId, status: &NavigationStatus) -> Result<()> {
        self.session.apply_status_to(tab_id, status)?;
        self.publish_status(tab_id, status);
        Ok(())
    }

    fn current_id(&self) -> Option<TabId> {
        self.session.current_tab().map(Tab::id)
    }

    fn publish_status(&self, tab_id: TabId, status: &NavigationStatus) {
        self.publish(SessionEvent::TabUpdated { tab_id });
        if let NavigationStatus::Failed { error } = status {
            self.publish(SessionEvent::NavigationFailed {
                tab_id,
                error: error.clone(),
            });
        }
    }

    fn publish_active(&self) {
        if let (Some(index), Some(tab_id)) = (self.session.active_index(), self.current_id()) {
            self.publish(SessionEvent::ActiveTabChanged { index, tab_id });
        }
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}
