//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Tab error: {0}")]
    Tab(#[from] lumen_tabs::TabError),

    #[error("No recently closed tabs")]
    NothingToRestore,
}
