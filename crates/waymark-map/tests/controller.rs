//! Integration tests for the map controller: position transitions, scene
//! styling, trigger forwarding, and the generation guard.

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
use waymark_core::{
    ApiClient, AppContext, FeatureHandle, FeatureHandles, Result, SessionProbe,
};
use waymark_map::{AltitudeTier, BaseStyle, MapController, MapPosition, QueryStyle};

fn entity(id: &str) -> Entity {
    Entity {
        id: id.to_string(),
        name: id.to_string(),
        location: GeoCoordinate {
            latitude: 40.0,
            longitude: -70.0,
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

struct MockApi {
    hosts: Vec<Entity>,
    pulls: Mutex<Vec<Vec<String>>>,
    blocking: AtomicBool,
    gate: Semaphore,
}

impl MockApi {
    fn new(hosts: Vec<Entity>) -> Arc<Self> {
        Arc::new(Self {
            hosts,
            pulls: Mutex::new(Vec::new()),
            blocking: AtomicBool::new(false),
            gate: Semaphore::new(0),
        })
    }
}

#[async_trait]
impl ApiClient for MockApi {
    async fn load_organizations(&self) -> Result<Vec<Entity>> {
        Ok(vec![entity("org")])
    }

    async fn load_hosts(&self) -> Result<Vec<Entity>> {
        Ok(self.hosts.clone())
    }

    async fn load_network_features(&self, host: &Entity) -> Result<FeatureHandles> {
        if self.blocking.load(Ordering::SeqCst) {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| waymark_core::Error::other("gate closed"))?;
            permit.forget();
        }
        Ok(FeatureHandles {
            query: FeatureHandle(format!("query:{}", host.id)),
            annotations: FeatureHandle(format!("annotations:{}", host.id)),
        })
    }

    async fn load_link_features(&self, entity: &Entity, host: &Entity) -> Result<FeatureHandles> {
        Ok(FeatureHandles {
            query: FeatureHandle(format!("query:{}:{}", host.id, entity.id)),
            annotations: FeatureHandle(format!("annotations:{}:{}", host.id, entity.id)),
        })
    }

    async fn load_drops(&self, _host: &Entity, _entity: &Entity) -> Result<Vec<DropRecord>> {
        Ok(Vec::new())
    }

    async fn pull_trigger_batch(
        &self,
        trigger_ids: &[String],
        _host: &Entity,
    ) -> Result<FeatureCollection> {
        self.pulls.lock().push(trigger_ids.to_vec());
        Ok(FeatureCollection {
            kind: "FeatureCollection".to_string(),
            crs: Crs {
                kind: "name".to_string(),
                properties: CrsProperties {
                    name: "EPSG:4326".to_string(),
                },
            },
            features: trigger_ids.iter().map(|id| feature(id)).collect(),
        })
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

fn controller_with(api: Arc<MockApi>) -> MapController {
    MapController::new(AppContext::new(api, Arc::new(MockSession)))
}

async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_hosts_position_loads_annotations() {
    let api = MockApi::new(vec![entity("h1"), entity("h2")]);
    let controller = controller_with(api);

    controller.set_position(MapPosition::Hosts);
    settle().await;

    let scene = controller.scene();
    assert_eq!(scene.hosts.len(), 2);
    assert_eq!(scene.base_style, BaseStyle::Dark);
    assert_eq!(scene.query_style, QueryStyle::None);
    assert!(scene.camera.is_none());
}

#[tokio::test]
async fn test_network_position_styles_and_features() {
    let api = MockApi::new(Vec::new());
    let controller = controller_with(api);
    let host = entity("h1");

    controller.set_position(MapPosition::Network { host: host.clone() });

    // Host annotation, styles, and camera are set synchronously.
    let scene = controller.scene();
    assert_eq!(scene.hosts.len(), 1);
    assert_eq!(scene.base_style, BaseStyle::Satellite);
    assert_eq!(scene.query_style, QueryStyle::Rich);
    let camera = scene.camera.unwrap();
    assert_eq!(camera.altitude, AltitudeTier::Medium);
    assert_eq!(camera.coordinate, host.location);

    settle().await;
    let handles = controller.scene().features.unwrap();
    assert_eq!(handles.query.0, "query:h1");
}

#[tokio::test]
async fn test_trigger_discovery_requires_host_context() {
    let api = MockApi::new(Vec::new());
    let controller = controller_with(Arc::clone(&api));

    controller.set_position(MapPosition::Hosts);
    settle().await;
    controller.discover_triggers(&["t1".to_string()]);
    settle().await;
    assert!(api.pulls.lock().is_empty());

    controller.set_position(MapPosition::Network { host: entity("h1") });
    settle().await;
    controller.discover_triggers(&["t1".to_string(), "t2".to_string()]);
    settle().await;

    assert_eq!(api.pulls.lock().len(), 1);
    assert_eq!(controller.stored_features().len(), 2);
}

#[tokio::test]
async fn test_position_change_clears_stored_features() {
    let api = MockApi::new(Vec::new());
    let controller = controller_with(api);

    controller.set_position(MapPosition::Network { host: entity("h1") });
    settle().await;
    controller.discover_triggers(&["t1".to_string()]);
    settle().await;
    assert_eq!(controller.stored_features().len(), 1);

    controller.set_position(MapPosition::Links {
        entity: entity("e1"),
        host: entity("h1"),
    });
    assert!(controller.stored_features().is_empty());
}

#[tokio::test]
async fn test_superseded_feature_load_never_lands() {
    let api = MockApi::new(vec![entity("h1")]);
    api.blocking.store(true, Ordering::SeqCst);
    let controller = controller_with(Arc::clone(&api));

    controller.set_position(MapPosition::Network { host: entity("h1") });
    settle().await;

    // Supersede while the network load is still held open.
    controller.set_position(MapPosition::Hosts);
    settle().await;
    api.gate.add_permits(16);
    settle().await;

    let scene = controller.scene();
    assert!(scene.features.is_none());
    assert_eq!(scene.base_style, BaseStyle::Dark);
}
