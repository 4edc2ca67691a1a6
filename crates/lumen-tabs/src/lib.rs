//! Lumen Tab Entity
//!
//! A tab is a value record describing one browsing surface. Its id is fixed
//! for its lifetime; the remaining fields are rewritten in place by the
//! session layer from rendering-engine status reports.

mod error;
mod tab;

pub use error::TabError;
pub use tab::{Tab, TabId};

pub type Result<T> = std::result::Result<T, TabError>;
