//! Integration tests for the trigger batcher: batch pooling, the slot
//! ceiling, coalescing, and the failed-batch policy.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;
use waymark_core::entity::{CounterRelationship, Entity, GeoCoordinate, Relationship};
use waymark_core::records::{
    CounterWeightRecord, Crs, CrsProperties, DropRecord, FeatureCollection, GeoNodeProperties,
    GeoNodeRecord, MediaRecord, PointGeometry, WeightRecord,
};
use waymark_core::{ApiClient, AppContext, Error, FeatureHandles, Result, SessionProbe};
use waymark_map::{FeatureStore, TriggerBatcher, MAX_OPEN_BATCHES};

fn host() -> Entity {
    Entity {
        id: "host".to_string(),
        name: "host".to_string(),
        location: GeoCoordinate {
            latitude: 0.0,
            longitude: 0.0,
        },
        live_location_enabled: None,
        description: String::new(),
        portrait_url: Url::parse("https://example.com/p.jpg").unwrap(),
        supplemental_image_url: None,
        supplemental_movie_url: None,
        relationship: Relationship::Admin,
        counter_relationship: CounterRelationship::Close,
        zoom: 2.0,
    }
}

fn feature(id: &str) -> GeoNodeRecord {
    GeoNodeRecord {
        kind: "Feature".to_string(),
        properties: GeoNodeProperties {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            live_location_enabled: None,
            zoom: 10.0,
            media: MediaRecord {
                portrait_id: "https://example.com/p.jpg".to_string(),
                supplement_id: "https://example.com/s.jpg".to_string(),
            },
            weight: WeightRecord::Peer,
            counter_weight: CounterWeightRecord::Close,
        },
        geometry: PointGeometry {
            kind: "Point".to_string(),
            coordinates: vec![0.0, 0.0],
        },
    }
}

fn collection_for(ids: &[String]) -> FeatureCollection {
    FeatureCollection {
        kind: "FeatureCollection".to_string(),
        crs: Crs {
            kind: "name".to_string(),
            properties: CrsProperties {
                name: "EPSG:4326".to_string(),
            },
        },
        features: ids.iter().map(|id| feature(id)).collect(),
    }
}

/// Mock that echoes one feature per pulled id, with an optional gate that
/// holds every pull open until permits are released.
struct MockApi {
    calls: Mutex<Vec<Vec<String>>>,
    blocking: AtomicBool,
    gate: Semaphore,
    fail: AtomicBool,
}

impl MockApi {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            blocking: AtomicBool::new(false),
            gate: Semaphore::new(0),
            fail: AtomicBool::new(false),
        })
    }

    fn release_all(&self) {
        self.blocking.store(false, Ordering::SeqCst);
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

#[async_trait]
impl ApiClient for MockApi {
    async fn load_organizations(&self) -> Result<Vec<Entity>> {
        Ok(Vec::new())
    }

    async fn load_hosts(&self) -> Result<Vec<Entity>> {
        Ok(Vec::new())
    }

    async fn load_network_features(&self, _host: &Entity) -> Result<FeatureHandles> {
        Err(Error::other("not exercised"))
    }

    async fn load_link_features(&self, _entity: &Entity, _host: &Entity) -> Result<FeatureHandles> {
        Err(Error::other("not exercised"))
    }

    async fn load_drops(&self, _host: &Entity, _entity: &Entity) -> Result<Vec<DropRecord>> {
        Ok(Vec::new())
    }

    async fn pull_trigger_batch(
        &self,
        trigger_ids: &[String],
        _host: &Entity,
    ) -> Result<FeatureCollection> {
        self.calls.lock().push(trigger_ids.to_vec());
        if self.blocking.load(Ordering::SeqCst) {
            let permit = self.gate.acquire().await.map_err(|_| Error::other("gate closed"))?;
            permit.forget();
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::other("pull refused"));
        }
        Ok(collection_for(trigger_ids))
    }
}

struct MockSession;

#[async_trait]
impl SessionProbe for MockSession {
    async fn sign_in(&self) -> bool {
        true
    }

    async fn sign_out(&self) -> bool {
        true
    }

    async fn is_signed_in(&self) -> bool {
        true
    }
}

fn batcher_with(api: Arc<MockApi>) -> (TriggerBatcher, Arc<Mutex<FeatureStore>>) {
    let context = AppContext::new(api, Arc::new(MockSession));
    let store = Arc::new(Mutex::new(FeatureStore::new()));
    let batcher = TriggerBatcher::new(context, host(), Arc::clone(&store));
    (batcher, store)
}

fn ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

async fn settle() {
    for _ in 0..128 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_one_discovery_yields_one_batch_with_all_ids() {
    let api = MockApi::new();
    let (batcher, store) = batcher_with(Arc::clone(&api));

    batcher.discover(&ids("t", 25));
    settle().await;

    let calls = api.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 25);
    assert_eq!(store.lock().features().len(), 25);
    assert_eq!(batcher.pending_len(), 0);
    assert_eq!(batcher.in_flight_len(), 0);
}

#[tokio::test]
async fn test_slot_ceiling_pools_overflow_in_pending() {
    let api = MockApi::new();
    api.blocking.store(true, Ordering::SeqCst);
    let (batcher, store) = batcher_with(Arc::clone(&api));

    // Each discovery opens one slot until the ceiling; the rest pool.
    for i in 0..MAX_OPEN_BATCHES + 2 {
        batcher.discover(&[format!("t{i}")]);
        settle().await;
    }
    assert_eq!(batcher.open_batches(), MAX_OPEN_BATCHES);
    assert_eq!(batcher.pending_len(), 2);
    assert_eq!(batcher.in_flight_len(), MAX_OPEN_BATCHES);

    api.release_all();
    settle().await;

    assert_eq!(batcher.open_batches(), 0);
    assert_eq!(batcher.pending_len(), 0);
    assert_eq!(store.lock().features().len(), MAX_OPEN_BATCHES + 2);
}

#[tokio::test]
async fn test_known_ids_are_coalesced() {
    let api = MockApi::new();
    let (batcher, _store) = batcher_with(Arc::clone(&api));

    batcher.discover(&["a".to_string(), "b".to_string()]);
    settle().await;
    batcher.discover(&["a".to_string(), "c".to_string()]);
    settle().await;

    let pulled: Vec<String> = api.calls.lock().iter().flatten().cloned().collect();
    assert_eq!(pulled.iter().filter(|id| id.as_str() == "a").count(), 1);
    assert!(batcher.is_resolved("a"));
    assert!(batcher.is_resolved("c"));
}

#[tokio::test]
async fn test_failed_batch_abandons_its_ids() {
    let api = MockApi::new();
    api.fail.store(true, Ordering::SeqCst);
    let (batcher, store) = batcher_with(Arc::clone(&api));

    batcher.discover(&["x".to_string()]);
    settle().await;

    assert!(batcher.is_resolved("x"));
    assert!(store.lock().is_empty());

    // Abandoned ids are never re-pulled.
    batcher.discover(&["x".to_string()]);
    settle().await;
    assert_eq!(api.calls.lock().len(), 1);
}

#[tokio::test]
async fn test_reset_aborts_slots_and_forgets_ids() {
    let api = MockApi::new();
    api.blocking.store(true, Ordering::SeqCst);
    let (batcher, store) = batcher_with(Arc::clone(&api));

    batcher.discover(&ids("t", 5));
    settle().await;
    assert_eq!(batcher.open_batches(), 1);

    batcher.reset();
    assert_eq!(batcher.open_batches(), 0);
    assert_eq!(batcher.pending_len(), 0);
    assert_eq!(batcher.in_flight_len(), 0);

    api.release_all();
    settle().await;
    assert!(store.lock().is_empty());
    assert!(!batcher.is_resolved("t0"));
}
