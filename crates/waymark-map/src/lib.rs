//! Map surface for Waymark
//!
//! Holds the state behind the map view: which position the map points at,
//! the scene handed to the renderer, the accumulated trigger features, and
//! the bounded-concurrency batcher that resolves triggers discovered while
//! exploring.

pub mod controller;
pub mod features;
pub mod triggers;

pub use controller::{
    AltitudeTier, BaseStyle, CameraTarget, MapController, MapPosition, MapScene, QueryStyle,
};
pub use features::FeatureStore;
pub use triggers::{FailurePolicy, TriggerBatcher, MAX_OPEN_BATCHES};
