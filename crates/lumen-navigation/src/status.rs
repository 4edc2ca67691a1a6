//! Load-progress reports produced by a render surface

use lumen_tabs::TabId;
use serde::{Deserialize, Serialize};

/// What the engine reported about a navigation.
///
/// For a single navigation the order is always `Started` followed by exactly
/// one of `Finished` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationStatus {
    Started,
    Finished {
        title: String,
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    Failed {
        error: String,
    },
}

/// A status report tagged with the tab whose surface produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEnvelope {
    pub tab_id: TabId,
    pub status: NavigationStatus,
}
