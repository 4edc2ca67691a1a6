//! Serializable views of the session for the presentation layer

use chrono::{DateTime, Utc};
use serde::Serialize;

use lumen_tabs::{Tab, TabId};

/// Short host-only label for a tab's address.
pub fn display_address(tab: &Tab) -> String {
    lumen_navigation::display_address(&tab.url)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
    pub title: String,
    pub display_address: String,
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub created_at: DateTime<Utc>,
    /// Last time the tab was selected, for recency ordering in tab search
    pub last_accessed_at: DateTime<Utc>,
}

impl From<&Tab> for TabInfo {
    fn from(tab: &Tab) -> Self {
        Self {
            id: tab.id(),
            url: tab.url.clone(),
            title: tab.display_title().to_string(),
            display_address: display_address(tab),
            is_loading: tab.is_loading,
            can_go_back: tab.can_go_back,
            can_go_forward: tab.can_go_forward,
            created_at: tab.created_at,
            last_accessed_at: tab.last_accessed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub active_index: Option<usize>,
    pub tabs: Vec<TabInfo>,
}

impl SessionSnapshot {
    pub fn current(&self) -> Option<&TabInfo> {
        self.active_index.and_then(|i| self.tabs.get(i))
    }

    /// Tabs ordered most recently selected first.
    pub fn recently_used(&self) -> Vec<&TabInfo> {
        let mut tabs: Vec<&TabInfo> = self.tabs.iter().collect();
        tabs.sort_by(|a, b| b.last_accessed_at.cmp(&a.last_accessed_at));
        tabs
    }
}
