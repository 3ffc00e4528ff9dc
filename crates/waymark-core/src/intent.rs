//! Outbound write intents
//!
//! The core emits intents; an external write workflow (media upload, REST
//! encoding) fulfills them. Components that fulfilled a canvas-mutating
//! intent call back into the owning controller to trigger a reload.

use crate::entity::{Entity, Relationship};
use crate::location::Location3D;
use crate::Result;
use async_trait::async_trait;
use url::Url;

/// Payload of a drop-creation intent
#[derive(Debug, Clone)]
pub enum DropPayload {
    /// An image to place (already uploaded; referenced by url).
    Abstraction { image_url: Url },
    /// A reference to another entity.
    Entity { entity: Entity },
    /// A link.
    Portal { url: Url },
}

/// An intent produced by the core for the external write workflow
#[derive(Debug, Clone)]
pub enum WriteIntent {
    CreateDrop {
        host: Entity,
        location: Location3D,
        payload: DropPayload,
    },
    DeleteDrop {
        host: Entity,
        drop_id: String,
    },
    UpdateRelationship {
        host: Entity,
        entity: Entity,
        relationship: Relationship,
    },
    CreateReport {
        host: Entity,
        entity: Entity,
    },
}

/// Fulfills write intents outside the core
#[async_trait]
pub trait WriteWorkflow: Send + Sync {
    async fn submit(&self, intent: WriteIntent) -> Result<()>;
}
