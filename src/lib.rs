//! # Waymark
//!
//! A location-anchored social canvas: entities live on a map, each entity
//! exposes a circular canvas of drops (images, links, and references to
//! other entities), and navigation walks a breadcrumb path of entities
//! inside a host's network.
//!
//! ## Architecture
//!
//! Waymark is organized as a workspace with multiple crates:
//!
//! 1. **waymark-core** - Entities, drops, geometry, wire records, errors,
//!    notices, and the async collaborator traits
//! 2. **waymark-canvas** - Drop registry, placement engine, studio, and
//!    drop form
//! 3. **waymark-map** - Feature store, trigger batcher, and map controller
//! 4. **waymark-navigation** - Session handling, header (host context),
//!    relationship form, and the navigation coordinator
//! 5. **waymark** - Re-exports and process-level setup

pub use waymark_canvas::{
    CanvasController, CanvasPosition, DropFormPosition, DropRegistry, FormInput, Studio,
};
pub use waymark_core::{
    ApiClient, AppContext, CounterRelationship, DropKind, DropPayload, Dropped, Entity, Error,
    FeatureHandle, FeatureHandles, GeoCoordinate, Location3D, Notice, Notices, Relationship,
    Result, SessionProbe, WriteIntent, WriteWorkflow,
};
pub use waymark_map::{
    BaseStyle, FeatureStore, MapController, MapPosition, MapScene, QueryStyle, TriggerBatcher,
};
pub use waymark_navigation::{
    AuthPosition, Authenticator, Coordinator, HeaderController, HeaderPosition, NavEvent,
    NavState, RelationshipFormPosition, RelationshipInput,
};

/// Initialize logging for the process
///
/// Respects `RUST_LOG`, defaulting to `info`.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer().with_target(true).with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    Ok(())
}
