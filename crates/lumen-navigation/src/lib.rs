//! Lumen Navigation
//!
//! - Address bar input resolution:
//!   1. `http(s)://` address → navigate unchanged
//!   2. Bare domain → navigate over https
//!   3. Anything else → search
//! - Intents (back, forward, reload, stop, navigate) flow from UI controls to
//!   the render surface of the displayed tab.
//! - Status reports (started, finished, failed) flow back, tagged with the tab
//!   whose surface produced them.

mod bridge;
mod display;
mod error;
mod headless;
mod input;
mod intent;
mod status;
mod surface;

pub use bridge::NavigationBridge;
pub use display::display_address;
pub use error::NavigationError;
pub use headless::{HeadlessFactory, HeadlessSurface};
pub use input::{normalize, InputResolution, InputResolver, DEFAULT_SEARCH_TEMPLATE};
pub use intent::NavigationIntent;
pub use status::{NavigationStatus, StatusEnvelope};
pub use surface::{RenderSurface, StatusQueue, StatusSink, SurfaceFactory};

pub type Result<T> = std::result::Result<T, NavigationError>;
