//! Lumen Session Management
//!
//! - A session is the ordered list of open tabs plus the active one
//! - Closing the last remaining tab is ignored; a session never empties
//! - Engine reports are the only way tab fields change after opening
//! - Sessions live in memory only; nothing survives a restart

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::{SessionEvent, SessionStore, StoreOptions};
pub use session::Session;

pub type Result<T> = std::result::Result<T, SessionError>;
