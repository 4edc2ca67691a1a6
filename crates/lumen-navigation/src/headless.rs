//! Headless render surface
//!
//! Stands in for a platform web view when none is available. It fetches
//! nothing: a load of a parseable URL succeeds immediately with the host as
//! the page title, anything else fails. Back/forward walk a private entry list
//! the way an engine's session history would.

use lumen_tabs::TabId;
use url::Url;

use crate::display::display_address;
use crate::status::NavigationStatus;
use crate::surface::{RenderSurface, StatusSink, SurfaceFactory};
use crate::Result;

pub struct HeadlessSurface {
    sink: StatusSink,
    entries: Vec<String>,
    /// Index into `entries` of the displayed entry
    current: Option<usize>,
}

impl HeadlessSurface {
    pub fn new(sink: StatusSink) -> Self {
        Self {
            sink,
            entries: Vec::new(),
            current: None,
        }
    }

    pub fn current_address(&self) -> Option<&str> {
        self.current.map(|i| self.entries[i].as_str())
    }

    fn can_go_back(&self) -> bool {
        matches!(self.current, Some(i) if i > 0)
    }

    fn can_go_forward(&self) -> bool {
        matches!(self.current, Some(i) if i + 1 < self.entries.len())
    }

    fn report_finished(&self) {
        let Some(url) = self.current_address() else {
            return;
        };

        self.sink.emit(NavigationStatus::Finished {
            title: display_address(url),
            url: url.to_string(),
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
        });
    }

    fn step(&mut self, to: usize) {
        self.sink.emit(NavigationStatus::Started);
        self.current = Some(to);
        self.report_finished();
    }
}

impl RenderSurface for HeadlessSurface {
    fn load(&mut self, address: &str) -> Result<()> {
        self.sink.emit(NavigationStatus::Started);

        if let Err(e) = Url::parse(address) {
            tracing::debug!(tab_id = %self.sink.tab_id(), address = %address, "Headless load failed");
            self.sink.emit(NavigationStatus::Failed {
                error: e.to_string(),
            });
            return Ok(());
        }

        let next = self.current.map_or(0, |i| i + 1);
        self.entries.truncate(next);
        self.entries.push(address.to_string());
        self.current = Some(next);
        self.report_finished();

        Ok(())
    }

    fn go_back(&mut self) -> Result<()> {
        if let Some(i) = self.current.filter(|i| *i > 0) {
            self.step(i - 1);
        }
        Ok(())
    }

    fn go_forward(&mut self) -> Result<()> {
        if let Some(i) = self.current.filter(|i| i + 1 < self.entries.len()) {
            self.step(i + 1);
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        if let Some(i) = self.current {
            self.step(i);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        // Loads complete synchronously, there is never anything to stop.
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct HeadlessFactory;

impl SurfaceFactory for HeadlessFactory {
    fn create(&mut self, tab_id: TabId, sink: StatusSink) -> Result<Box<dyn RenderSurface>> {
        tracing::debug!(tab_id = %tab_id, "Creating headless surface");
        Ok(Box::new(HeadlessSurface::new(sink)))
    }
}
