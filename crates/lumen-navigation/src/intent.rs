//! Commands sent from UI controls to a render surface

use serde::{Deserialize, Serialize};

/// A one-shot command for the displayed render surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "address", rename_all = "snake_case")]
pub enum NavigationIntent {
    GoBack,
    GoForward,
    Reload,
    Stop,
    NavigateTo(String),
}

impl NavigationIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationIntent::GoBack => "go_back",
            NavigationIntent::GoForward => "go_forward",
            NavigationIntent::Reload => "reload",
            NavigationIntent::Stop => "stop",
            NavigationIntent::NavigateTo(_) => "navigate_to",
        }
    }
}

impl std::fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationIntent::NavigateTo(address) => write!(f, "navigate_to({address})"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
