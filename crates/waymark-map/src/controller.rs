//! Map controller
//!
//! Owns the map position, the scene the renderer consumes, the feature
//! store, and the trigger batcher for the current host context. Position
//! transitions follow the same discipline as the canvas: bump the
//! generation, abort the in-flight loader, reset dependent state, then
//! dispatch the new position's load.

use crate::features::FeatureStore;
use crate::triggers::TriggerBatcher;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use waymark_core::context::AppContext;
use waymark_core::entity::{Entity, GeoCoordinate};
use waymark_core::notice::Notice;
use waymark_core::records::GeoNodeRecord;
use waymark_core::FeatureHandles;

/// Where the map is pointed
#[derive(Debug, Clone, Default)]
pub enum MapPosition {
    /// Public organizations, shown before sign-in.
    #[default]
    Organizations,
    /// The signed-in user's hosts.
    Hosts,
    /// One host's whole network.
    Network { host: Entity },
    /// The links of one entity within a host's network.
    Links { entity: Entity, host: Entity },
}

/// Styling of the geometry-query layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStyle {
    Light,
    Dark,
    Rich,
    #[default]
    None,
}

/// Base map imagery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseStyle {
    Satellite,
    Light,
    #[default]
    Dark,
}

/// How far above the target the camera settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeTier {
    High,
    Medium,
    Low,
}

/// Where the camera should fly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub coordinate: GeoCoordinate,
    pub altitude: AltitudeTier,
}

/// Everything the renderer needs to draw the current position
#[derive(Debug, Clone, Default)]
pub struct MapScene {
    /// Entities shown as annotations.
    pub hosts: Vec<Entity>,
    /// Query + annotation feature sources, once loaded.
    pub features: Option<FeatureHandles>,
    pub query_style: QueryStyle,
    pub base_style: BaseStyle,
    pub camera: Option<CameraTarget>,
}

struct Inner {
    position: MapPosition,
    scene: MapScene,
    generation: u64,
    loader: Option<JoinHandle<()>>,
    batcher: Option<TriggerBatcher>,
}

/// Controller for the map surface
pub struct MapController {
    inner: Arc<Mutex<Inner>>,
    store: Arc<Mutex<FeatureStore>>,
    context: Arc<AppContext>,
}

impl MapController {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                position: MapPosition::Organizations,
                scene: MapScene::default(),
                generation: 0,
                loader: None,
                batcher: None,
            })),
            store: Arc::new(Mutex::new(FeatureStore::new())),
            context,
        }
    }

    /// Transition the map to a new position
    ///
    /// Synchronously: aborts the in-flight loader, bumps the generation,
    /// resets the batcher and feature store, and rebuilds the scene with
    /// the position's styles and camera. The position's feature load then
    /// runs in the background and applies only if its generation still
    /// matches on completion.
    pub fn set_position(&self, position: MapPosition) {
        let mut inner = self.inner.lock();
        if let Some(loader) = inner.loader.take() {
            loader.abort();
        }
        inner.generation += 1;
        let generation = inner.generation;
        if let Some(batcher) = inner.batcher.take() {
            batcher.reset();
        }
        self.store.lock().clear();

        inner.position = position.clone();
        match position {
            MapPosition::Organizations => {
                inner.scene = MapScene {
                    query_style: QueryStyle::Light,
                    base_style: BaseStyle::Dark,
                    ..MapScene::default()
                };
                inner.loader = Some(self.spawn_organizations_load(generation));
            }
            MapPosition::Hosts => {
                inner.scene = MapScene {
                    query_style: QueryStyle::None,
                    base_style: BaseStyle::Dark,
                    ..MapScene::default()
                };
                inner.loader = Some(self.spawn_hosts_load(generation));
            }
            MapPosition::Network { host } => {
                inner.scene = MapScene {
                    hosts: vec![host.clone()],
                    features: None,
                    query_style: QueryStyle::Rich,
                    base_style: BaseStyle::Satellite,
                    camera: Some(CameraTarget {
                        coordinate: host.location,
                        altitude: AltitudeTier::Medium,
                    }),
                };
                inner.batcher = Some(TriggerBatcher::new(
                    Arc::clone(&self.context),
                    host.clone(),
                    Arc::clone(&self.store),
                ));
                inner.loader = Some(self.spawn_network_load(host, generation));
            }
            MapPosition::Links { entity, host } => {
                inner.scene = MapScene {
                    hosts: Vec::new(),
                    features: None,
                    query_style: QueryStyle::Dark,
                    base_style: BaseStyle::Light,
                    camera: Some(CameraTarget {
                        coordinate: entity.location,
                        altitude: AltitudeTier::Low,
                    }),
                };
                inner.batcher = Some(TriggerBatcher::new(
                    Arc::clone(&self.context),
                    host.clone(),
                    Arc::clone(&self.store),
                ));
                inner.loader = Some(self.spawn_links_load(entity, host, generation));
            }
        }
    }

    /// Forward discovered trigger ids to the batcher
    ///
    /// Dropped silently outside a host context (Organizations and Hosts
    /// positions have no trigger layer).
    pub fn discover_triggers(&self, ids: &[String]) {
        let inner = self.inner.lock();
        if let Some(batcher) = &inner.batcher {
            batcher.discover(ids);
        }
    }

    pub fn position(&self) -> MapPosition {
        self.inner.lock().position.clone()
    }

    pub fn scene(&self) -> MapScene {
        self.inner.lock().scene.clone()
    }

    /// Merged trigger features for the current position.
    pub fn stored_features(&self) -> Vec<GeoNodeRecord> {
        self.store.lock().features().to_vec()
    }

    pub fn open_batches(&self) -> usize {
        self.inner
            .lock()
            .batcher
            .as_ref()
            .map_or(0, |b| b.open_batches())
    }

    fn spawn_organizations_load(&self, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let context = Arc::clone(&self.context);
        tokio::spawn(async move {
            match context.api.load_organizations().await {
                Ok(organizations) => {
                    let mut inner = inner.lock();
                    if inner.generation == generation {
                        inner.scene.hosts = organizations;
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "organizations load failed");
                    context
                        .notices
                        .publish(Notice::titled("Unable to load organizations"));
                }
            }
        })
    }

    fn spawn_hosts_load(&self, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let context = Arc::clone(&self.context);
        tokio::spawn(async move {
            match context.api.load_hosts().await {
                Ok(hosts) => {
                    let mut inner = inner.lock();
                    if inner.generation == generation {
                        inner.scene.hosts = hosts;
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "hosts load failed");
                    context
                        .notices
                        .publish(Notice::titled("Unable to load your places"));
                }
            }
        })
    }

    fn spawn_network_load(&self, host: Entity, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let context = Arc::clone(&self.context);
        tokio::spawn(async move {
            match context.api.load_network_features(&host).await {
                Ok(handles) => {
                    let mut inner = inner.lock();
                    if inner.generation == generation {
                        inner.scene.features = Some(handles);
                    }
                }
                Err(err) => {
                    tracing::error!(host = %host.id, error = %err, "network load failed");
                    context
                        .notices
                        .publish(Notice::titled("Unable to load the network"));
                }
            }
        })
    }

    fn spawn_links_load(&self, entity: Entity, host: Entity, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let context = Arc::clone(&self.context);
        tokio::spawn(async move {
            match context.api.load_link_features(&entity, &host).await {
                Ok(handles) => {
                    let mut inner = inner.lock();
                    if inner.generation == generation {
                        inner.scene.features = Some(handles);
                    }
                }
                Err(err) => {
                    tracing::error!(entity = %entity.id, error = %err, "links load failed");
                    context
                        .notices
                        .publish(Notice::titled("Unable to load links"));
                }
            }
        })
    }
}
