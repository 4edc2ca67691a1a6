//! Render surface seam
//!
//! A render surface is the platform web view for one tab. The core only
//! sends it commands and listens to what it reports; fetching, parsing,
//! history and scripting all stay inside the engine.

use lumen_tabs::TabId;
use tokio::sync::mpsc;

use crate::intent::NavigationIntent;
use crate::status::{NavigationStatus, StatusEnvelope};
use crate::Result;

/// Commands a platform engine must accept for one tab.
pub trait RenderSurface: Send {
    fn load(&mut self, address: &str) -> Result<()>;

    fn go_back(&mut self) -> Result<()>;

    fn go_forward(&mut self) -> Result<()>;

    fn reload(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    /// Called when the surface is mounted or unmounted.
    fn set_visible(&mut self, _visible: bool) {}

    /// Forward an intent to the matching engine call.
    fn apply(&mut self, intent: &NavigationIntent) -> Result<()> {
        match intent {
            NavigationIntent::GoBack => self.go_back(),
            NavigationIntent::GoForward => self.go_forward(),
            NavigationIntent::Reload => self.reload(),
            NavigationIntent::Stop => self.stop(),
            NavigationIntent::NavigateTo(address) => self.load(address),
        }
    }
}

/// Builds one surface per tab. The sink handed over is bound to that tab,
/// so every report the surface makes is attributed to it.
pub trait SurfaceFactory: Send {
    fn create(&mut self, tab_id: TabId, sink: StatusSink) -> Result<Box<dyn RenderSurface>>;
}

/// Sending half of the status queue, bound to a single tab.
///
/// Engines may call [`StatusSink::emit`] from any thread; reports are queued
/// and applied later by whoever owns the [`StatusQueue`].
#[derive(Debug, Clone)]
pub struct StatusSink {
    tab_id: TabId,
    tx: mpsc::UnboundedSender<StatusEnvelope>,
}

impl StatusSink {
    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn emit(&self, status: NavigationStatus) {
        let envelope = StatusEnvelope {
            tab_id: self.tab_id,
            status,
        };

        if self.tx.send(envelope).is_err() {
            tracing::debug!(tab_id = %self.tab_id, "Status queue closed, dropping report");
        }
    }
}

/// Single-consumer queue that carries engine reports onto the UI sequence.
pub struct StatusQueue {
    tx: mpsc::UnboundedSender<StatusEnvelope>,
    rx: mpsc::UnboundedReceiver<StatusEnvelope>,
}

impl StatusQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A sink whose reports are attributed to `tab_id`.
    pub fn sink(&self, tab_id: TabId) -> StatusSink {
        StatusSink {
            tab_id,
            tx: self.tx.clone(),
        }
    }

    /// Take everything queued so far, in arrival order, without waiting.
    pub fn drain(&mut self) -> Vec<StatusEnvelope> {
        let mut envelopes = Vec::new();
        while let Ok(envelope) = self.rx.try_recv() {
            envelopes.push(envelope);
        }
        envelopes
    }

    /// Wait for the next report.
    pub async fn recv(&mut self) -> Option<StatusEnvelope> {
        self.rx.recv().await
    }
}

impl Default for StatusQueue {
    fn default() -> Self {
        Self::new()
    }
}
