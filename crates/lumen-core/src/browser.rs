//! Main browser state container
//!
//! The core owns all tab state; render surfaces only display pages and report
//! on them. Everything here runs on the UI sequence. Engine reports reach the
//! tabs only through `pump_status` / `next_status`, which apply them to the tab
//! whose surface produced them.

use tokio::sync::broadcast;

use lumen_navigation::{
    HeadlessFactory, InputResolution, InputResolver, NavigationBridge, NavigationIntent,
    StatusEnvelope, SurfaceFactory,
};
use lumen_session::{SessionEvent, SessionStore};
use lumen_tabs::{Tab, TabId};

use crate::config::Config;
use crate::snapshot::{SessionSnapshot, TabInfo};
use crate::Result;

pub struct Browser {
    config: Config,
    /// Tabs, active index and change notifications
    store: SessionStore,
    /// One render surface per tab
    bridge: NavigationBridge,
    /// Input resolver for address bar
    input_resolver: InputResolver,
}

impl Browser {
    pub fn new(config: Config, factory: Box<dyn SurfaceFactory>) -> Result<Self> {
        config.validate()?;

        let store = SessionStore::new(config.store_options());
        let input_resolver = InputResolver::with_search_engine(config.search_engine.clone());

        tracing::info!(homepage = %config.homepage, "Browser initialized");

        Ok(Self {
            config,
            store,
            bridge: NavigationBridge::new(factory),
            input_resolver,
        })
    }

    /// Browser backed by in-process headless surfaces.
    pub fn headless(config: Config) -> Result<Self> {
        Self::new(config, Box::new(HeadlessFactory))
    }

    // === Tab operations ===

    /// Open a tab, make it current and start loading `address` in its surface.
    /// The address is passed through as given.
    pub fn open_tab(&mut self, address: impl Into<String>) -> TabId {
        let address = address.into();
        let tab_id = self.store.open_tab(address.clone());
        self.attach_and_load(tab_id, address);
        self.sync_mount();
        tab_id
    }

    pub fn open_home_tab(&mut self) -> TabId {
        let homepage = self.config.homepage.clone();
        self.open_tab(homepage)
    }

    /// Open a tab without switching to it.
    pub fn open_tab_background(&mut self, address: impl Into<String>) -> TabId {
        let address = address.into();
        let tab_id = self.store.open_tab_background(address.clone());
        self.attach_and_load(tab_id, address);
        self.sync_mount();
        tab_id
    }

    /// Close the tab at `index`. Ignored for the last remaining tab and for
    /// out-of-range indices.
    pub fn close_tab(&mut self, index: usize) {
        if let Some(tab_id) = self.store.close_tab(index) {
            self.bridge.detach(tab_id);
            self.sync_mount();
        }
    }

    /// Switch to the tab at `index`. Out-of-range indices are ignored.
    pub fn select_tab(&mut self, index: usize) {
        self.store.select_tab(index);
        self.sync_mount();
    }

    pub fn move_tab(&mut self, from: usize, to: usize) {
        self.store.move_tab(from, to);
    }

    /// Reopen the most recently closed tab in a fresh surface.
    pub fn restore_last_closed_tab(&mut self) -> Result<TabId> {
        let tab_id = self.store.restore_last_closed()?;

        if let Some(url) = self.store.current_tab().map(|t| t.url.clone()) {
            self.attach_and_load(tab_id, url);
        }
        self.sync_mount();

        Ok(tab_id)
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.store.current_tab()
    }

    pub fn tabs(&self) -> &[Tab] {
        self.store.tabs()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.store.active_index()
    }

    /// Change notifications for the presentation layer.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.store.subscribe()
    }

    // === Navigation operations ===

    pub fn resolve_input(&self, input: &str) -> InputResolution {
        self.input_resolver.resolve(input)
    }

    /// Normalize address bar input and load it in the displayed tab.
    pub fn navigate(&mut self, input: &str) {
        let address = self.resolve_input(input).into_url();
        self.publish(NavigationIntent::NavigateTo(address));
    }

    pub fn go_back(&mut self) {
        self.publish(NavigationIntent::GoBack);
    }

    pub fn go_forward(&mut self) {
        self.publish(NavigationIntent::GoForward);
    }

    pub fn reload(&mut self) {
        self.publish(NavigationIntent::Reload);
    }

    pub fn stop(&mut self) {
        self.publish(NavigationIntent::Stop);
    }

    /// Hand an intent to the displayed tab's surface. Dropped when no
    /// surface is displayed.
    pub fn publish(&mut self, intent: NavigationIntent) {
        self.bridge.dispatch(intent);
    }

    // === Engine reports ===

    /// Apply every queued engine report. Returns how many were applied.
    pub fn pump_status(&mut self) -> usize {
        let mut applied = 0;
        for envelope in self.bridge.drain_status() {
            if self.apply_envelope(&envelope) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for at least one engine report, then apply everything queued.
    pub async fn next_status(&mut self) -> usize {
        let Some(first) = self.bridge.recv_status().await else {
            return 0;
        };

        let applied = usize::from(self.apply_envelope(&first));
        applied + self.pump_status()
    }

    fn apply_envelope(&mut self, envelope: &StatusEnvelope) -> bool {
        match self.store.apply_status_to(envelope.tab_id, &envelope.status) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(
                    tab_id = %envelope.tab_id,
                    error = %e,
                    "Discarding report for a closed tab"
                );
                false
            }
        }
    }

    // === Snapshots ===

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active_index: self.store.active_index(),
            tabs: self.store.tabs().iter().map(TabInfo::from).collect(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    // === Config ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn attach_and_load(&mut self, tab_id: TabId, address: String) {
        if let Err(e) = self.bridge.attach(tab_id) {
            tracing::warn!(tab_id = %tab_id, error = %e, "Failed to create render surface");
            return;
        }

        if let Err(e) = self
            .bridge
            .dispatch_to(tab_id, NavigationIntent::NavigateTo(address))
        {
            tracing::warn!(tab_id = %tab_id, error = %e, "Initial load not delivered");
        }
    }

    /// Keep the displayed surface in step with the current tab.
    fn sync_mount(&mut self) {
        if let Some(tab_id) = self.store.current_tab().map(Tab::id) {
            self.bridge.mount(tab_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_navigation::{NavigationError, NavigationStatus, RenderSurface, StatusSink};
    use std::sync::{Arc, Mutex};

    /// Engine double: records intents, reports only when the test says so.
    #[derive(Default)]
    struct Engine {
        intents: Mutex<Vec<(TabId, NavigationIntent)>>,
        sinks: Mutex<Vec<StatusSink>>,
        fail_creation: Mutex<bool>,
    }

    impl Engine {
        fn intents(&self) -> Vec<(TabId, NavigationIntent)> {
            self.intents.lock().unwrap().clone()
        }

        fn sink(&self, tab_id: TabId) -> StatusSink {
            self.sinks
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.tab_id() == tab_id)
                .cloned()
                .unwrap()
        }
    }

    struct ScriptedSurface {
        tab_id: TabId,
        engine: Arc<Engine>,
    }

    impl ScriptedSurface {
        fn record(&self, intent: NavigationIntent) -> lumen_navigation::Result<()> {
            self.engine
                .intents
                .lock()
                .unwrap()
                .push((self.tab_id, intent));
            Ok(())
        }
    }

    impl RenderSurface for ScriptedSurface {
        fn load(&mut self, address: &str) -> lumen_navigation::Result<()> {
            self.record(NavigationIntent::NavigateTo(address.to_string()))
        }

        fn go_back(&mut self) -> lumen_navigation::Result<()> {
            self.record(NavigationIntent::GoBack)
        }

        fn go_forward(&mut self) -> lumen_navigation::Result<()> {
            self.record(NavigationIntent::GoForward)
        }

        fn reload(&mut self) -> lumen_navigation::Result<()> {
            self.record(NavigationIntent::Reload)
        }

        fn stop(&mut self) -> lumen_navigation::Result<()> {
            self.record(NavigationIntent::Stop)
        }
    }

    struct ScriptedFactory(Arc<Engine>);

    impl SurfaceFactory for ScriptedFactory {
        fn create(
            &mut self,
            tab_id: TabId,
            sink: StatusSink,
        ) -> lumen_navigation::Result<Box<dyn RenderSurface>> {
            if *self.0.fail_creation.lock().unwrap() {
                return Err(NavigationError::Surface {
                    intent: "create".to_string(),
                    reason: "engine unavailable".to_string(),
                });
            }

            self.0.sinks.lock().unwrap().push(sink);
            Ok(Box::new(ScriptedSurface {
                tab_id,
                engine: Arc::clone(&self.0),
            }))
        }
    }

    fn browser() -> (Browser, Arc<Engine>) {
        let engine = Arc::new(Engine::default());
        let browser = Browser::new(
            Config::default(),
            Box::new(ScriptedFactory(Arc::clone(&engine))),
        )
        .unwrap();
        (browser, engine)
    }

    fn finished(title: &str, url: &str) -> NavigationStatus {
        NavigationStatus::Finished {
            title: title.to_string(),
            url: url.to_string(),
            can_go_back: true,
            can_go_forward: false,
        }
    }

    #[test]
    fn test_open_tab_scenario() {
        let (mut browser, engine) = browser();
        assert!(browser.current_tab().is_none());

        let id = browser.open_tab("https://example.com");

        let tab = browser.current_tab().unwrap();
        assert_eq!(tab.id(), id);
        assert_eq!(tab.url, "https://example.com");
        assert_eq!(tab.title, "New Tab");
        assert!(!tab.is_loading);

        assert_eq!(
            engine.intents(),
            vec![(
                id,
                NavigationIntent::NavigateTo("https://example.com".to_string())
            )]
        );
    }

    #[test]
    fn test_open_home_tab_uses_config() {
        let (mut browser, engine) = browser();
        let id = browser.open_home_tab();

        assert_eq!(browser.current_tab().unwrap().url, "about:blank");
        assert_eq!(
            engine.intents(),
            vec![(id, NavigationIntent::NavigateTo("about:blank".to_string()))]
        );
    }

    #[test]
    fn test_intents_follow_selected_tab() {
        let (mut browser, engine) = browser();
        let first = browser.open_tab("https://a.com");
        let second = browser.open_tab("https://b.com");

        browser.reload();
        browser.select_tab(0);
        browser.go_back();
        browser.select_tab(1);
        browser.stop();

        let intents: Vec<_> = engine.intents().into_iter().skip(2).collect();
        assert_eq!(
            intents,
            vec![
                (second, NavigationIntent::Reload),
                (first, NavigationIntent::GoBack),
                (second, NavigationIntent::Stop),
            ]
        );
    }

    #[test]
    fn test_navigate_normalizes_input() {
        let (mut browser, engine) = browser();
        let id = browser.open_tab("about:blank");

        browser.navigate("example.com");
        browser.navigate("hello world");
        browser.navigate("https://x.com");

        let intents: Vec<_> = engine.intents().into_iter().skip(1).collect();
        assert_eq!(
            intents,
            vec![
                (id, NavigationIntent::NavigateTo("https://example.com".to_string())),
                (
                    id,
                    NavigationIntent::NavigateTo(
                        "https://duckduckgo.com/?q=hello%20world".to_string()
                    )
                ),
                (id, NavigationIntent::NavigateTo("https://x.com".to_string())),
            ]
        );
    }

    #[test]
    fn test_intent_without_tabs_is_dropped() {
        let (mut browser, engine) = browser();
        browser.reload();
        browser.navigate("example.com");
        assert!(engine.intents().is_empty());
    }

    #[test]
    fn test_status_applies_to_producing_tab() {
        let (mut browser, engine) = browser();
        let background = browser.open_tab("https://a.com");
        let front = browser.open_tab("https://b.com");

        // The background tab finishes after the user switched away from it
        engine.sink(background).emit(NavigationStatus::Started);
        engine
            .sink(background)
            .emit(finished("A", "https://a.com/"));

        assert_eq!(browser.pump_status(), 2);

        let tabs = browser.tabs();
        assert_eq!(tabs[0].id(), background);
        assert_eq!(tabs[0].title, "A");
        assert!(tabs[0].can_go_back);
        assert_eq!(tabs[1].id(), front);
        assert_eq!(tabs[1].title, "New Tab");
        assert_eq!(browser.current_tab().unwrap().id(), front);
    }

    #[test]
    fn test_reports_for_closed_tab_are_discarded() {
        let (mut browser, engine) = browser();
        browser.open_tab("https://a.com");
        let doomed = browser.open_tab("https://b.com");
        let sink = engine.sink(doomed);

        browser.close_tab(1);
        sink.emit(NavigationStatus::Started);

        assert_eq!(browser.pump_status(), 0);
        assert_eq!(browser.tabs().len(), 1);
        assert!(!browser.current_tab().unwrap().is_loading);
    }

    #[test]
    fn test_close_scenarios() {
        let (mut browser, engine) = browser();
        let first = browser.open_tab("https://a.com");
        browser.open_tab("https://b.com");
        assert_eq!(browser.active_index(), Some(1));

        browser.close_tab(1);
        assert_eq!(browser.active_index(), Some(0));
        assert_eq!(browser.tabs().len(), 1);

        browser.close_tab(0);
        assert_eq!(browser.tabs().len(), 1);

        // The surviving tab is displayed again
        browser.reload();
        assert_eq!(engine.intents().last(), Some(&(first, NavigationIntent::Reload)));
    }

    #[test]
    fn test_restore_gets_new_surface() {
        let (mut browser, engine) = browser();
        browser.open_tab("https://a.com");
        browser.open_tab("https://b.com");
        browser.close_tab(1);

        let restored = browser.restore_last_closed_tab().unwrap();

        assert_eq!(browser.current_tab().unwrap().id(), restored);
        assert_eq!(
            engine.intents().last(),
            Some(&(
                restored,
                NavigationIntent::NavigateTo("https://b.com".to_string())
            ))
        );

        browser.go_forward();
        assert_eq!(
            engine.intents().last(),
            Some(&(restored, NavigationIntent::GoForward))
        );
    }

    #[test]
    fn test_restore_with_nothing_closed() {
        let (mut browser, _engine) = browser();
        browser.open_tab("https://a.com");
        assert!(browser.restore_last_closed_tab().is_err());
    }

    #[test]
    fn test_tab_survives_surface_failure() {
        let (mut browser, engine) = browser();
        *engine.fail_creation.lock().unwrap() = true;

        browser.open_tab("https://a.com");
        browser.reload();

        assert_eq!(browser.tabs().len(), 1);
        assert!(engine.intents().is_empty());
    }

    #[test]
    fn test_background_open_keeps_display() {
        let (mut browser, engine) = browser();
        let front = browser.open_tab("https://a.com");
        let background = browser.open_tab_background("https://b.com");

        browser.reload();

        let intents = engine.intents();
        assert_eq!(
            intents[1],
            (
                background,
                NavigationIntent::NavigateTo("https://b.com".to_string())
            )
        );
        assert_eq!(intents[2], (front, NavigationIntent::Reload));
    }

    #[test]
    fn test_move_tab_keeps_display_and_announces_index() {
        let (mut browser, engine) = browser();
        let a = browser.open_tab("https://a.com");
        let b = browser.open_tab("https://b.com");
        browser.select_tab(0);
        let mut rx = browser.subscribe();

        browser.move_tab(0, 1);

        assert_eq!(browser.tabs()[0].id(), b);
        assert_eq!(browser.active_index(), Some(1));
        assert_eq!(browser.current_tab().unwrap().id(), a);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::TabsChanged);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::ActiveTabChanged { index: 1, tab_id: a }
        );

        browser.reload();
        assert_eq!(engine.intents().last(), Some(&(a, NavigationIntent::Reload)));
    }

    #[test]
    fn test_subscribers_see_updates() {
        let (mut browser, engine) = browser();
        let id = browser.open_tab("https://a.com");
        let mut rx = browser.subscribe();

        engine.sink(id).emit(NavigationStatus::Failed {
            error: "refused".to_string(),
        });
        browser.pump_status();

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::TabUpdated { tab_id: id });
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::NavigationFailed {
                tab_id: id,
                error: "refused".to_string()
            }
        );
    }

    #[test]
    fn test_snapshot() {
        let (mut browser, engine) = browser();
        let id = browser.open_tab("https://www.example.com/page");
        engine.sink(id).emit(NavigationStatus::Started);
        browser.pump_status();

        let snapshot = browser.snapshot();
        assert_eq!(snapshot.active_index, Some(0));
        let current = snapshot.current().unwrap();
        assert_eq!(current.display_address, "example.com");
        assert!(current.is_loading);

        let json: serde_json::Value =
            serde_json::from_str(&browser.snapshot_json().unwrap()).unwrap();
        assert_eq!(json["tabs"][0]["id"], id.to_string());
        assert_eq!(json["tabs"][0]["is_loading"], true);
    }

    #[test]
    fn test_headless_round_trip() {
        let mut browser = Browser::headless(Config::default()).unwrap();
        browser.open_tab("https://example.com/");
        browser.pump_status();

        browser.navigate("rust-lang.org");
        browser.pump_status();

        let tab = browser.current_tab().unwrap();
        assert_eq!(tab.url, "https://rust-lang.org");
        assert_eq!(tab.title, "rust-lang.org");
        assert!(tab.can_go_back);
        assert!(!tab.is_loading);

        browser.go_back();
        browser.pump_status();
        let tab = browser.current_tab().unwrap();
        assert_eq!(tab.url, "https://example.com/");
        assert!(tab.can_go_forward);
    }

    #[tokio::test]
    async fn test_next_status_marshals_reports_from_other_threads() {
        let (mut browser, engine) = browser();
        let id = browser.open_tab("https://a.com");
        let sink = engine.sink(id);

        std::thread::spawn(move || {
            sink.emit(NavigationStatus::Started);
            sink.emit(NavigationStatus::Finished {
                title: "A".to_string(),
                url: "https://a.com/".to_string(),
                can_go_back: false,
                can_go_forward: false,
            });
        })
        .join()
        .unwrap();

        let applied = browser.next_status().await;
        assert_eq!(applied, 2);
        assert_eq!(browser.current_tab().unwrap().title, "A");
        assert!(!browser.current_tab().unwrap().is_loading);
    }
}
