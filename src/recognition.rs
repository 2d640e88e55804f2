//! Live recognition page: the panel showing the latest gate reads and the
//! timer that keeps it fed.

use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::dom::Element;
use crate::error::ConsoleError;
use crate::types::RecognitionResult;
use log::{debug, error, info};
use std::time::Duration;
use tokio::sync::mpsc::{channel, Receiver, Sender};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const ROOT_ID: &str = "recent-results";
pub const PLATE_ID: &str = "plate-display";
pub const CONFIDENCE_ID: &str = "confidence-display";
pub const STATUS_ID: &str = "status-display";
pub const BADGE_ID: &str = "status-badge";
pub const LIST_ID: &str = "recent-list";

const PLACEHOLDER: &str = "-";
const IDLE_BADGE: &str = "badge bg-secondary";

#[derive(Debug, Clone)]
pub struct RecognitionPanel {
    root: Element,
}

impl RecognitionPanel {
    pub fn new() -> Self {
        let summary = Element::new("div")
            .with_child(Element::new("span").with_id(PLATE_ID).with_text(PLACEHOLDER))
            .with_child(
                Element::new("span")
                    .with_id(CONFIDENCE_ID)
                    .with_text(PLACEHOLDER),
            )
            .with_child(Element::new("span").with_id(STATUS_ID).with_text(PLACEHOLDER))
            .with_child(
                Element::new("span")
                    .with_id(BADGE_ID)
                    .with_class(IDLE_BADGE)
                    .with_text(PLACEHOLDER),
            );
        RecognitionPanel {
            root: Element::new("section")
                .with_id(ROOT_ID)
                .with_child(summary)
                .with_child(Element::new("ul").with_id(LIST_ID)),
        }
    }

    /// Shows a snapshot of recent results, newest first. The snapshot fully
    /// replaces whatever was shown before.
    pub fn apply(&mut self, results: &[RecognitionResult]) {
        match results.first() {
            Some(latest) => {
                let status = latest.status();
                self.set_text(PLATE_ID, &latest.plate);
                self.set_text(CONFIDENCE_ID, &format!("{:.2}", latest.confidence));
                self.set_text(STATUS_ID, status.label());
                self.set_text(BADGE_ID, status.label());
                self.set_class(BADGE_ID, status.badge_class());
            }
            None => {
                for id in &[PLATE_ID, CONFIDENCE_ID, STATUS_ID, BADGE_ID] {
                    self.set_text(id, PLACEHOLDER);
                }
                self.set_class(BADGE_ID, IDLE_BADGE);
            }
        }

        if let Some(list) = self.root.find_by_id_mut(LIST_ID) {
            list.clear();
            for result in results {
                let line = format!(
                    "{} {} {:.2} {}",
                    result.time,
                    result.plate,
                    result.confidence,
                    result.status().label()
                );
                list.append(
                    Element::new("li")
                        .with_attr("data-plate", &result.plate)
                        .with_text(line.trim()),
                );
            }
        }
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.root.find_by_id_mut(id) {
            el.set_text(text);
        }
    }

    fn set_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.root.find_by_id_mut(id) {
            el.set_attr("class", class);
        }
    }

    fn text(&self, id: &str) -> String {
        self.root
            .find_by_id(id)
            .map(Element::text_content)
            .unwrap_or_default()
    }

    pub fn plate(&self) -> String {
        self.text(PLATE_ID)
    }

    pub fn confidence(&self) -> String {
        self.text(CONFIDENCE_ID)
    }

    pub fn status(&self) -> String {
        self.text(STATUS_ID)
    }

    pub fn badge_class(&self) -> Option<&str> {
        self.root.find_by_id(BADGE_ID).and_then(|el| el.attr("class"))
    }

    pub fn recent(&self) -> Vec<String> {
        self.root
            .find_by_id(LIST_ID)
            .map(|list| list.elements().map(Element::text_content).collect())
            .unwrap_or_default()
    }

    pub fn element(&self) -> &Element {
        &self.root
    }
}

impl Default for RecognitionPanel {
    fn default() -> Self {
        RecognitionPanel::new()
    }
}

/// Background task fetching `/api/recent` once per interval.
pub struct RecognitionPoller {
    cancel: CancelToken,
    task: JoinHandle<()>,
}

impl RecognitionPoller {
    pub fn start(
        api: ApiClient,
        interval: Duration,
        limit: usize,
        tx: Sender<Vec<RecognitionResult>>,
    ) -> Self {
        let cancel = CancelToken::new();
        let task = tokio::spawn(run(api, interval, limit, tx, cancel.clone()));
        RecognitionPoller { cancel, task }
    }

    /// Cancels the timer and any request in flight, then waits for the task.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            error!("Recognition poller failed: {}", e);
        }
    }
}

async fn run(
    api: ApiClient,
    period: Duration,
    limit: usize,
    tx: Sender<Vec<RecognitionResult>>,
    cancel: CancelToken,
) {
    info!("Polling recent results every {:?}", period);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        match api.recent_results(limit, &cancel).await {
            Ok(results) => {
                debug!("Fetched {} recent results", results.len());
                tokio::select! {
                    sent = tx.send(results) => {
                        if sent.is_err() {
                            info!("Recognition display closed");
                            break;
                        }
                    }
                    _ = cancel.cancelled() => break,
                }
            }
            Err(ConsoleError::Cancelled(_)) => break,
            Err(e) => error!("Failed to fetch recent results: {}", e),
        }
    }
    info!("Recognition poller stopped");
}

/// The recognition page: a panel plus the poller feeding it.
pub struct RecognitionDisplay {
    panel: RecognitionPanel,
    poller: RecognitionPoller,
    updates: Receiver<Vec<RecognitionResult>>,
}

impl RecognitionDisplay {
    /// Shows the latest result straight away, then starts polling.
    pub async fn mount(api: ApiClient, interval: Duration, limit: usize) -> Self {
        let mut panel = RecognitionPanel::new();
        match api.latest_result(&CancelToken::new()).await {
            Ok(Some(latest)) => panel.apply(&[latest]),
            Ok(None) => debug!("No recognition result yet"),
            Err(e) => error!("Failed to fetch latest result: {}", e),
        }
        let (tx, rx) = channel(8);
        RecognitionDisplay {
            panel,
            poller: RecognitionPoller::start(api, interval, limit, tx),
            updates: rx,
        }
    }

    /// Waits for the next snapshot and applies it. Returns false once the
    /// poller has stopped.
    pub async fn next_update(&mut self) -> bool {
        match self.updates.recv().await {
            Some(results) => {
                self.panel.apply(&results);
                true
            }
            None => false,
        }
    }

    pub fn panel(&self) -> &RecognitionPanel {
        &self.panel
    }

    pub async fn unmount(self) {
        self.poller.stop().await;
    }
}
