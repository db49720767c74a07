//! One address field being typed into.
//!
//! An [`AutocompleteSession`] debounces keystrokes, runs a lookup per committed
//! query, and publishes [`OptionsUpdate`]s. Responses can resolve out of order, so
//! each lookup carries the sequence number of the query that started it and only the
//! newest one may publish. A superseded lookup is aborted as soon as a newer query is
//! committed.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{
    sync::{mpsc, watch},
    task::{JoinHandle, JoinSet},
};
use tracing::{debug, trace};

use crate::{
    core::{AutocompleteOutcome, LocationAutocomplete},
    debounce::{CommittedQuery, DebouncedSearchController},
    ranking::LocationKind,
};

/// Options for the latest committed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsUpdate {
    pub sequence: u64,
    pub outcome: AutocompleteOutcome,
}

pub struct AutocompleteSession {
    controller: DebouncedSearchController,
    city: watch::Sender<Option<String>>,
    driver: JoinHandle<()>,
}

impl AutocompleteSession {
    /// Start a session for one field. Updates arrive on the returned receiver, which
    /// closes when the session is closed or dropped.
    pub fn spawn(
        service: Arc<LocationAutocomplete>,
        kind: LocationKind,
        city: Option<String>,
    ) -> (Self, mpsc::UnboundedReceiver<OptionsUpdate>) {
        let (controller, commits) = DebouncedSearchController::spawn(service.config().debounce);
        let (city_tx, city_rx) = watch::channel(city);
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        let driver = tokio::spawn(drive(service, kind, commits, city_rx, updates_tx));
        (
            Self {
                controller,
                city: city_tx,
                driver,
            },
            updates_rx,
        )
    }

    /// Feed the current field contents.
    pub fn input(&self, value: impl Into<String>) -> bool {
        self.controller.input(value)
    }

    /// Change the city that street lookups are narrowed to. Takes effect from the
    /// next committed query.
    pub fn set_city(&self, city: Option<String>) {
        self.city.send_replace(city);
    }

    /// Stop debouncing and abort any lookup still in flight.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for AutocompleteSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(
    service: Arc<LocationAutocomplete>,
    kind: LocationKind,
    mut commits: mpsc::UnboundedReceiver<CommittedQuery>,
    city: watch::Receiver<Option<String>>,
    updates: mpsc::UnboundedSender<OptionsUpdate>,
) {
    let latest = Arc::new(AtomicU64::new(0));
    // Dropping the set aborts whatever is still running.
    let mut in_flight = JoinSet::new();

    while let Some(CommittedQuery { sequence, query }) = commits.recv().await {
        latest.store(sequence, Ordering::SeqCst);
        if !in_flight.is_empty() {
            debug!(sequence, "Aborting superseded lookup");
            in_flight.abort_all();
        }
        while in_flight.try_join_next().is_some() {}

        let city = city.borrow().clone();
        let service = Arc::clone(&service);
        let latest = Arc::clone(&latest);
        let updates = updates.clone();

        in_flight.spawn(async move {
            let outcome = service.suggest(kind, &query, city.as_deref()).await;
            if latest.load(Ordering::SeqCst) != sequence {
                trace!(sequence, "Discarding stale lookup result");
                return;
            }
            if updates.send(OptionsUpdate { sequence, outcome }).is_err() {
                trace!(sequence, "Options receiver dropped");
            }
        });
    }
}
