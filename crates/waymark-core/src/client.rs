//! Asynchronous collaborator traits
//!
//! The core never performs network I/O itself; it consumes these opaque
//! async interfaces. Implementations live outside this workspace (and in
//! test mocks).

use crate::entity::Entity;
use crate::records::{DropRecord, FeatureCollection};
use crate::Result;
use async_trait::async_trait;

/// Opaque handle to a map feature source
///
/// The renderer resolves these; the core only stores and swaps them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureHandle(pub String);

/// The pair of sources a map position exposes: a geometry-query source
/// (trigger discovery runs against it) and an annotation source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureHandles {
    pub query: FeatureHandle,
    pub annotations: FeatureHandle,
}

/// Read-side API consumed by the controllers
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Organizations available for sign-in candidacy
    async fn load_organizations(&self) -> Result<Vec<Entity>>;

    /// Hosts owned by the signed-in user
    async fn load_hosts(&self) -> Result<Vec<Entity>>;

    /// Feature sources for a host's whole network
    async fn load_network_features(&self, host: &Entity) -> Result<FeatureHandles>;

    /// Feature sources for the links of one entity within a host's network
    async fn load_link_features(&self, entity: &Entity, host: &Entity) -> Result<FeatureHandles>;

    /// Raw drop records for a (host, centered entity) pair
    ///
    /// Server-side filtered; empty when the entity's counter-relationship
    /// is Distant (callers guard before even asking).
    async fn load_drops(&self, host: &Entity, entity: &Entity) -> Result<Vec<DropRecord>>;

    /// Resolve a batch of trigger ids into full feature data
    async fn pull_trigger_batch(
        &self,
        trigger_ids: &[String],
        host: &Entity,
    ) -> Result<FeatureCollection>;
}

/// Session boundary: sign-in/out and liveness probes
#[async_trait]
pub trait SessionProbe: Send + Sync {
    /// Attempt to sign in; false means the attempt failed (not an error)
    async fn sign_in(&self) -> bool;

    /// Attempt to sign out; false means the attempt failed
    async fn sign_out(&self) -> bool;

    /// Whether a session is currently active (boot probe)
    async fn is_signed_in(&self) -> bool;
}
