//! Navigation bridge
//!
//! Keeps one render surface per tab and routes intents to the surface that is
//! currently mounted. Reports flow back through the per-tab sinks into the
//! status queue, so a report is always attributed to the tab that produced it
//! and never to whichever tab happens to be active when it arrives.

use std::collections::HashMap;

use lumen_tabs::TabId;

use crate::error::NavigationError;
use crate::intent::NavigationIntent;
use crate::status::StatusEnvelope;
use crate::surface::{RenderSurface, StatusQueue, SurfaceFactory};
use crate::Result;

pub struct NavigationBridge {
    factory: Box<dyn SurfaceFactory>,
    /// Map of tab id -> its surface
    surfaces: HashMap<TabId, Box<dyn RenderSurface>>,
    /// Tab whose surface is displayed
    mounted: Option<TabId>,
    queue: StatusQueue,
}

impl NavigationBridge {
    pub fn new(factory: Box<dyn SurfaceFactory>) -> Self {
        Self {
            factory,
            surfaces: HashMap::new(),
            mounted: None,
            queue: StatusQueue::new(),
        }
    }

    /// Create the surface for a tab. Attaching twice keeps the first surface.
    pub fn attach(&mut self, tab_id: TabId) -> Result<()> {
        if self.surfaces.contains_key(&tab_id) {
            return Ok(());
        }

        let sink = self.queue.sink(tab_id);
        let mut surface = self.factory.create(tab_id, sink)?;
        surface.set_visible(false);
        self.surfaces.insert(tab_id, surface);

        tracing::debug!(tab_id = %tab_id, "Attached render surface");
        Ok(())
    }

    /// Drop a tab's surface. Reports it already queued are left for the
    /// consumer to discard.
    pub fn detach(&mut self, tab_id: TabId) {
        if self.surfaces.remove(&tab_id).is_none() {
            return;
        }

        if self.mounted == Some(tab_id) {
            self.mounted = None;
        }

        tracing::debug!(tab_id = %tab_id, "Detached render surface");
    }

    /// Display `tab_id`'s surface and hide the previous one.
    pub fn mount(&mut self, tab_id: TabId) {
        if self.mounted == Some(tab_id) {
            return;
        }

        if let Some(previous) = self.mounted.take() {
            if let Some(surface) = self.surfaces.get_mut(&previous) {
                surface.set_visible(false);
            }
        }

        match self.surfaces.get_mut(&tab_id) {
            Some(surface) => {
                surface.set_visible(true);
                self.mounted = Some(tab_id);
            }
            None => {
                tracing::debug!(tab_id = %tab_id, "No surface to mount");
            }
        }
    }

    pub fn mounted(&self) -> Option<TabId> {
        self.mounted
    }

    pub fn is_attached(&self, tab_id: TabId) -> bool {
        self.surfaces.contains_key(&tab_id)
    }

    /// Send an intent to the mounted surface.
    ///
    /// With nothing mounted the intent is dropped. Engine errors are logged;
    /// the caller never sees them.
    pub fn dispatch(&mut self, intent: NavigationIntent) {
        let Some(tab_id) = self.mounted else {
            tracing::debug!(intent = %intent, "No mounted surface, dropping intent");
            return;
        };

        if let Err(e) = self.dispatch_to(tab_id, intent) {
            tracing::warn!(tab_id = %tab_id, error = %e, "Intent not delivered");
        }
    }

    /// Send an intent to a specific tab's surface, mounted or not.
    pub fn dispatch_to(&mut self, tab_id: TabId, intent: NavigationIntent) -> Result<()> {
        let surface = self
            .surfaces
            .get_mut(&tab_id)
            .ok_or(NavigationError::NoSurface(tab_id))?;

        tracing::debug!(tab_id = %tab_id, intent = %intent, "Dispatching intent");
        surface.apply(&intent)
    }

    /// Reports queued since the last call, in arrival order.
    pub fn drain_status(&mut self) -> Vec<StatusEnvelope> {
        self.queue.drain()
    }

    /// Wait for the next report.
    pub async fn recv_status(&mut self) -> Option<StatusEnvelope> {
        self.queue.recv().await
    }
}
