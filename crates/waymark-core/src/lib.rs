//! # Waymark Core
//!
//! Core types, traits, and geometry for Waymark.
//! Provides the fundamental abstractions for entities, drops, canvas
//! geometry, wire records, notices, and the async collaborator boundary.

pub mod client;
pub mod context;
pub mod drop;
pub mod entity;
pub mod error;
pub mod intent;
pub mod location;
pub mod notice;
pub mod records;

pub use client::{ApiClient, FeatureHandle, FeatureHandles, SessionProbe};
pub use context::AppContext;
pub use drop::{
    sort_by_layout_priority, DropKind, Dropped, DroppedAbstraction, DroppedEntity, DroppedPortal,
    ABSTRACTION_RADIUS, ENTITY_RADIUS, PORTAL_RADIUS,
};
pub use entity::{CounterRelationship, Entity, GeoCoordinate, Relationship};
pub use error::{Error, LoadError, Result, SessionError, WriteError};
pub use intent::{DropPayload, WriteIntent, WriteWorkflow};
pub use location::{scaled_radius, Location3D};
pub use notice::{Notice, Notices};
pub use records::{
    CounterWeightRecord, Crs, CrsProperties, DataEnvelope, DropRecord, FeatureCollection,
    GeoNodeProperties, GeoNodeRecord, MediaExtension, MediaRecord, PointGeometry,
    PullTriggersRequest, TriggerProperties, TriggerRecord, WeightRecord,
};
