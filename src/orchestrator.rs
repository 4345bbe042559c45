use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::config::StalePolicy;
use crate::error::FetchError;
use crate::hn_client::{RequestTarget, SearchApi};
use crate::models::Story;
use crate::reducer::{Action, FetchStore};

/// Called from the runtime after a round-trip resolves, so the UI can wake up and `pump`.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

struct RoundTrip {
    generation: u64,
    target: RequestTarget,
    result: Result<Vec<Story>, FetchError>,
}

/// Turns committed search terms into round-trips and feeds their outcomes to a `FetchStore`.
///
/// Round-trips run on the tokio runtime; their outcomes are queued and only reach the
/// store when the owner calls `pump`, so every dispatch happens on the owner's thread.
pub struct FetchOrchestrator<A> {
    api: A,
    runtime: Handle,
    endpoint: String,
    policy: StalePolicy,
    active: Option<RequestTarget>,
    generation: u64,
    in_flight: usize,
    outcome_tx: UnboundedSender<RoundTrip>,
    outcome_rx: UnboundedReceiver<RoundTrip>,
    notify: Option<Notify>,
}

impl<A: SearchApi> FetchOrchestrator<A> {
    pub fn new(api: A, runtime: Handle, endpoint: impl Into<String>, policy: StalePolicy) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            api,
            runtime,
            endpoint: endpoint.into(),
            policy,
            active: None,
            generation: 0,
            in_flight: 0,
            outcome_tx,
            outcome_rx,
            notify: None,
        }
    }

    pub fn set_notify(&mut self, notify: Notify) {
        self.notify = Some(notify);
    }

    pub fn target_for(&self, committed_term: &str) -> RequestTarget {
        RequestTarget::new(self.endpoint.clone(), committed_term)
    }

    /// The target of the most recently started round-trip.
    pub fn active_target(&self) -> Option<&RequestTarget> {
        self.active.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts a round-trip if `committed_term` maps to a different target than the active one.
    /// The first call always starts one.
    pub fn sync(&mut self, committed_term: &str, store: &mut FetchStore) -> bool {
        let target = self.target_for(committed_term);
        if self.active.as_ref() == Some(&target) {
            return false;
        }

        self.start(target, store);
        true
    }

    /// Runs the active target again. Does nothing before the first `sync`.
    pub fn refetch(&mut self, store: &mut FetchStore) -> bool {
        match self.active.clone() {
            Some(target) => {
                self.start(target, store);
                true
            }
            None => false,
        }
    }

    fn start(&mut self, target: RequestTarget, store: &mut FetchStore) {
        self.generation += 1;
        self.in_flight += 1;
        self.active = Some(target.clone());
        info!(url = %target.as_url(), generation = self.generation, "starting round-trip");

        store.dispatch(Action::FetchInit);

        let future = self.api.search(target.clone());
        let generation = self.generation;
        let outcome_tx = self.outcome_tx.clone();
        let notify = self.notify.clone();

        self.runtime.spawn(async move {
            let result = future.await;
            if outcome_tx.send(RoundTrip { generation, target, result }).is_err() {
                // Receiver gone: the app is shutting down
                return;
            }
            if let Some(notify) = notify {
                notify();
            }
        });
    }

    /// Applies every outcome that has arrived since the last call. Never blocks.
    pub fn pump(&mut self, store: &mut FetchStore) -> bool {
        let mut changed = false;
        while let Ok(round_trip) = self.outcome_rx.try_recv() {
            changed |= self.apply(round_trip, store);
        }
        changed
    }

    fn apply(&mut self, round_trip: RoundTrip, store: &mut FetchStore) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let url = round_trip.target.as_url();
        let superseded = round_trip.generation != self.generation;

        if superseded && self.policy == StalePolicy::LatestOnly {
            debug!(%url, generation = round_trip.generation, "discarding superseded outcome");
            return false;
        }
        if superseded {
            debug!(%url, generation = round_trip.generation, "applying superseded outcome");
        }

        match round_trip.result {
            Ok(items) => {
                info!(%url, count = items.len(), "round-trip succeeded");
                store.dispatch(Action::FetchSuccess { items })
            }
            Err(e) => {
                warn!(%url, error = %e, "round-trip failed");
                store.dispatch(Action::FetchFailure)
            }
        }
    }

    /// Waits for the next outcome and applies it.
    #[cfg(test)]
    pub async fn settle(&mut self, store: &mut FetchStore) -> bool {
        match self.outcome_rx.recv().await {
            Some(round_trip) => self.apply(round_trip, store),
            None => false,
        }
    }
}
