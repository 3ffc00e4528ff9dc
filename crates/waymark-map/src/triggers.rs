//! Trigger batcher
//!
//! Map exploration discovers lightweight trigger features faster than the
//! API can resolve them one by one. The batcher pools discovered ids and
//! pulls them in batches over a bounded number of concurrent slots. Each
//! id lives in exactly one of three sets at a time: `pending` (waiting for
//! a slot), `in_flight` (inside an open batch), or `resolved` (pulled, or
//! abandoned after a failed batch).

use crate::features::FeatureStore;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;
use waymark_core::context::AppContext;
use waymark_core::entity::Entity;
use waymark_core::notice::Notice;

/// Upper bound on concurrently open batch pulls.
pub const MAX_OPEN_BATCHES: usize = 10;

/// What happens to the ids of a batch whose pull failed
///
/// A single decision point. `AbandonIds` counts them resolved-with-loss:
/// the features never appear, but the ids are not re-pulled either. A
/// requeue variant would move them back to pending here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    AbandonIds,
}

#[derive(Default)]
struct BatchState {
    pending: HashSet<String>,
    in_flight: HashSet<String>,
    resolved: HashSet<String>,
    slots: HashMap<Uuid, JoinHandle<()>>,
    /// Bumped on reset so a worker that raced past its abort point
    /// cannot touch state from a previous map position.
    epoch: u64,
}

/// Everything a slot worker needs, cloned per slot.
#[derive(Clone)]
struct SlotShared {
    state: Arc<Mutex<BatchState>>,
    store: Arc<Mutex<FeatureStore>>,
    context: Arc<AppContext>,
    host: Entity,
    policy: FailurePolicy,
}

/// Pools trigger ids and resolves them in bounded concurrent batches
pub struct TriggerBatcher {
    state: Arc<Mutex<BatchState>>,
    store: Arc<Mutex<FeatureStore>>,
    context: Arc<AppContext>,
    host: Entity,
    policy: FailurePolicy,
}

impl TriggerBatcher {
    pub fn new(
        context: Arc<AppContext>,
        host: Entity,
        store: Arc<Mutex<FeatureStore>>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(BatchState::default())),
            store,
            context,
            host,
            policy: FailurePolicy::default(),
        }
    }

    /// Register newly discovered trigger ids
    ///
    /// Ids already pending, in flight, or resolved are dropped. If a batch
    /// slot is free, one batch starts immediately, bearing ALL pending ids
    /// (including ones pooled by earlier calls while every slot was busy).
    pub fn discover(&self, ids: &[String]) {
        let mut state = self.state.lock();
        for id in ids {
            if state.pending.contains(id)
                || state.in_flight.contains(id)
                || state.resolved.contains(id)
            {
                continue;
            }
            state.pending.insert(id.clone());
        }
        self.start_slot_locked(&mut state);
    }

    /// Abort every open batch and forget all ids (map position changed).
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.epoch += 1;
        for (_, handle) in state.slots.drain() {
            handle.abort();
        }
        state.pending.clear();
        state.in_flight.clear();
        state.resolved.clear();
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    pub fn open_batches(&self) -> usize {
        self.state.lock().slots.len()
    }

    pub fn is_resolved(&self, id: &str) -> bool {
        self.state.lock().resolved.contains(id)
    }

    fn start_slot_locked(&self, state: &mut BatchState) {
        if state.slots.len() >= MAX_OPEN_BATCHES || state.pending.is_empty() {
            return;
        }
        let batch: Vec<String> = state.pending.drain().collect();
        state.in_flight.extend(batch.iter().cloned());

        let slot = Uuid::new_v4();
        let epoch = state.epoch;
        let shared = SlotShared {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            context: Arc::clone(&self.context),
            host: self.host.clone(),
            policy: self.policy,
        };
        let handle = tokio::spawn(run_slot(slot, batch, epoch, shared));
        state.slots.insert(slot, handle);
    }
}

impl Drop for TriggerBatcher {
    fn drop(&mut self) {
        for (_, handle) in self.state.lock().slots.drain() {
            handle.abort();
        }
    }
}

/// One slot worker: pulls its batch, then keeps draining whatever pooled
/// up while it was busy, releasing the slot only when pending runs dry.
async fn run_slot(slot: Uuid, initial: Vec<String>, epoch: u64, shared: SlotShared) {
    let mut batch = initial;
    loop {
        let result = shared
            .context
            .api
            .pull_trigger_batch(&batch, &shared.host)
            .await;

        let next = {
            let mut state = shared.state.lock();
            if state.epoch != epoch {
                return;
            }
            for id in &batch {
                state.in_flight.remove(id);
                state.resolved.insert(id.clone());
            }
            match result {
                Ok(collection) => shared.store.lock().merge(collection),
                Err(err) => {
                    tracing::error!(
                        host = %shared.host.id,
                        ids = batch.len(),
                        error = %err,
                        "trigger batch pull failed"
                    );
                    shared
                        .context
                        .notices
                        .publish(Notice::titled("Unable to load map features"));
                    match shared.policy {
                        // Ids stay resolved-with-loss.
                        FailurePolicy::AbandonIds => {}
                    }
                }
            }
            if state.pending.is_empty() {
                state.slots.remove(&slot);
                None
            } else {
                let next: Vec<String> = state.pending.drain().collect();
                state.in_flight.extend(next.iter().cloned());
                Some(next)
            }
        };

        match next {
            Some(n) => batch = n,
            None => return,
        }
    }
}
