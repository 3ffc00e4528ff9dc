//! Interactive canvas for the centered entity
//!
//! The canvas shows the drops placed on an entity's circular content area
//! and, for admins, a studio for placing and lifting drops. This crate
//! owns the studio state machine, the generation-guarded drop registry,
//! the placement/hit-testing geometry, and the drop form workflow.

pub mod controller;
pub mod form;
pub mod placement;
pub mod registry;
pub mod studio;

pub use controller::{CanvasController, CanvasPosition};
pub use form::{DropFormPosition, FormInput};
pub use placement::{
    content_center, in_content_circle, targeted_drop, within_proximity, CONTENT_RADIUS,
    LIFT_RADIUS, PROXIMITY_RADIUS,
};
pub use registry::{classify_records, DropRegistry, Generation, LoadOutcome};
pub use studio::Studio;
