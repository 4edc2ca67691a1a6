//! Tab data structure
//!
//! A tab is one browsing surface: its address, its title, whether it is
//! loading, and whether the engine can go back or forward. Only the id is
//! fixed; everything else is rewritten from engine status reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque tab identity, stable for the lifetime of the tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier
    id: TabId,
    /// Current address
    pub url: String,
    /// Page title, a placeholder until the first load finishes
    pub title: String,
    /// True between a Started report and its Finished/Failed
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// When the tab was opened
    pub created_at: DateTime<Utc>,
    /// Last time the tab was selected
    pub last_accessed_at: DateTime<Utc>,
}

impl Tab {
    pub fn new(url: impl Into<String>, placeholder_title: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: TabId::new(),
            url: url.into(),
            title: placeholder_title.into(),
            is_loading: false,
            can_go_back: false,
            can_go_forward: false,
            created_at: now,
            last_accessed_at: now,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    /// Engine reported that a navigation started.
    pub fn begin_loading(&mut self) {
        tracing::debug!(tab_id = %self.id, "Tab loading started");
        self.is_loading = true;
    }

    /// Engine reported a completed navigation.
    pub fn finish_loading(
        &mut self,
        title: String,
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    ) {
        tracing::debug!(tab_id = %self.id, url = %url, "Tab loading finished");
        self.is_loading = false;
        self.title = title;
        self.url = url;
        self.can_go_back = can_go_back;
        self.can_go_forward = can_go_forward;
    }

    /// Engine reported a failed navigation. Only the loading flag changes.
    pub fn fail_loading(&mut self) {
        self.is_loading = false;
    }

    /// Record that the user looked at this tab.
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    /// Get display title (with fallback to URL)
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}
