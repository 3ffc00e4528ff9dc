//! Navigation for Waymark
//!
//! Session handling, the host-context header, the relationship form, and
//! the coordinator that drives the map, canvas, and header from navigation
//! events.

pub mod auth;
pub mod coordinator;
pub mod header;
pub mod relationship_form;

pub use auth::{AuthPosition, Authenticator};
pub use coordinator::{
    transition, updated_entity_path, Command, Coordinator, NavEvent, NavState, Transition,
};
pub use header::{HeaderController, HeaderPosition};
pub use relationship_form::{RelationshipFormPosition, RelationshipInput};
