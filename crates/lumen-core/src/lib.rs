//! Lumen Core
//!
//! Central coordination layer for the Lumen browser shell. The core owns all
//! tab state; platform web views only render and report back.

mod browser;
mod config;
mod error;
mod snapshot;

pub use browser::Browser;
pub use config::Config;
pub use error::CoreError;
pub use snapshot::{display_address, SessionSnapshot, TabInfo};

// Re-export core components
pub use lumen_navigation::{
    normalize, HeadlessFactory, HeadlessSurface, InputResolution, InputResolver,
    NavigationBridge, NavigationError, NavigationIntent, NavigationStatus, RenderSurface,
    StatusEnvelope, StatusQueue, StatusSink, SurfaceFactory,
};
pub use lumen_session::{Session, SessionError, SessionEvent, SessionStore, StoreOptions};
pub use lumen_tabs::{Tab, TabError, TabId};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
