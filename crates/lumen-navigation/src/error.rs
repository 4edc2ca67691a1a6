//! Navigation error types

use lumen_tabs::TabId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No surface attached for tab: {0}")]
    NoSurface(TabId),

    #[error("Surface rejected {intent}: {reason}")]
    Surface { intent: String, reason: String },
}
