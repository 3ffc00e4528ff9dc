//! Wire records
//!
//! serde mirrors of the REST payloads consumed and produced by the core.
//! These are kept dumb on purpose: decoding into domain types (and the
//! validation that goes with it) happens in `entity` and `drop`.

use serde::{Deserialize, Serialize};

/// Envelope every read endpoint wraps its payload in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// The wrapped payload.
    pub data: T,
}

/// A GeoJSON feature describing one entity node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoNodeRecord {
    /// Always "Feature".
    #[serde(rename = "type")]
    pub kind: String,
    /// Entity properties.
    pub properties: GeoNodeProperties,
    /// Point geometry.
    pub geometry: PointGeometry,
}

/// Properties block of a [`GeoNodeRecord`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoNodeProperties {
    pub id: String,
    pub name: String,
    pub description: String,
    pub live_location_enabled: Option<bool>,
    /// Zoom threshold at which the node becomes visible.
    pub zoom: f64,
    pub media: MediaRecord,
    /// Viewer's permission level on this entity.
    pub weight: WeightRecord,
    /// Visibility granted to the viewer by this entity.
    pub counter_weight: CounterWeightRecord,
}

/// Media references carried by an entity node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    /// URL of the portrait image.
    pub portrait_id: String,
    /// URL of the supplemental image or movie.
    pub supplement_id: String,
}

/// Wire spelling of the viewer's permission level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightRecord {
    Admin,
    Peer,
    // Wire spelling is historical and must be preserved.
    #[serde(rename = "Aquainted")]
    Acquainted,
    Distant,
}

/// Wire spelling of the visibility granted to the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterWeightRecord {
    Close,
    Distant,
}

/// Point geometry: `[longitude, latitude]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGeometry {
    /// Always "Point".
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

/// A lightweight trigger feature discovered while exploring the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: TriggerProperties,
    pub geometry: PointGeometry,
}

/// Properties block of a [`TriggerRecord`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerProperties {
    pub trigger_id: String,
    pub zoom: f64,
}

/// A raw drop record before classification
///
/// Exactly one of `image_id`, `portal_url`, `geo_node` is expected to be
/// populated; classification enforces that shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropRecord {
    pub id: String,
    /// Canvas position as `[x, y, z]`.
    pub canvas_location: Vec<f64>,
    pub image_id: Option<String>,
    pub portal_url: Option<String>,
    #[serde(rename = "api_geo_node")]
    pub geo_node: Option<GeoNodeRecord>,
}

/// Request body for a trigger batch pull
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullTriggersRequest {
    pub trigger_ids: Vec<String>,
}

/// A persisted GeoJSON feature collection — the trigger merge target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub crs: Crs,
    pub features: Vec<GeoNodeRecord>,
}

/// Coordinate reference system block of a [`FeatureCollection`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crs {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: CrsProperties,
}

/// Properties of a [`Crs`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrsProperties {
    pub name: String,
}

/// Supported media file extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaExtension {
    Png,
    Jpg,
    Mp4,
    Mov,
}

impl MediaExtension {
    /// Parse a file extension, case-insensitively
    pub fn parse(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "mp4" => Some(Self::Mp4),
            "mov" => Some(Self::Mov),
            _ => None,
        }
    }

    /// Whether this extension denotes a still image
    pub fn is_image(self) -> bool {
        matches!(self, Self::Png | Self::Jpg)
    }
}
