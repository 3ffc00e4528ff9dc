//! Entities — profile nodes in the social/location graph
//!
//! An [`Entity`] is an immutable snapshot received from the network. There
//! is no in-place mutation anywhere in the core: position transitions
//! replace entity references wholesale.

use crate::error::LoadError;
use crate::records::{CounterWeightRecord, GeoNodeRecord, MediaExtension, WeightRecord};
use url::Url;

/// Viewer's permission level on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Admin,
    Peer,
    Acquainted,
    Distant,
}

impl From<WeightRecord> for Relationship {
    fn from(weight: WeightRecord) -> Self {
        match weight {
            WeightRecord::Admin => Relationship::Admin,
            WeightRecord::Peer => Relationship::Peer,
            WeightRecord::Acquainted => Relationship::Acquainted,
            WeightRecord::Distant => Relationship::Distant,
        }
    }
}

/// Visibility an entity grants the viewer
///
/// `Distant` hides the entity's canvas entirely: the drop registry must end
/// up empty and the presentation falls back to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterRelationship {
    Close,
    Distant,
}

impl From<CounterWeightRecord> for CounterRelationship {
    fn from(weight: CounterWeightRecord) -> Self {
        match weight {
            CounterWeightRecord::Close => CounterRelationship::Close,
            CounterWeightRecord::Distant => CounterRelationship::Distant,
        }
    }
}

/// A geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A profile node, immutable once decoded
///
/// Exactly one of `supplemental_image_url` / `supplemental_movie_url` is
/// set, decided by the media extension of the supplement reference.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub location: GeoCoordinate,
    pub live_location_enabled: Option<bool>,
    pub description: String,
    pub portrait_url: Url,
    pub supplemental_image_url: Option<Url>,
    pub supplemental_movie_url: Option<Url>,
    pub relationship: Relationship,
    pub counter_relationship: CounterRelationship,
    /// Map zoom threshold at which this entity appears.
    pub zoom: f64,
}

impl Entity {
    /// Decode an entity from a geo-node record
    ///
    /// Malformed media references are an operational decode failure, never
    /// a panic: the record came off the wire.
    pub fn from_record(record: &GeoNodeRecord) -> Result<Self, LoadError> {
        let properties = &record.properties;

        let portrait_url = Url::parse(&properties.media.portrait_id).map_err(|_| {
            LoadError::Decode {
                reason: format!("invalid portrait url for entity {}", properties.id),
            }
        })?;
        let supplement_url = Url::parse(&properties.media.supplement_id).map_err(|_| {
            LoadError::Decode {
                reason: format!("invalid supplement url for entity {}", properties.id),
            }
        })?;

        let extension = supplement_url
            .path()
            .rsplit('.')
            .next()
            .and_then(MediaExtension::parse)
            .ok_or_else(|| LoadError::Decode {
                reason: format!("unknown supplement media type for entity {}", properties.id),
            })?;

        let (supplemental_image_url, supplemental_movie_url) = if extension.is_image() {
            (Some(supplement_url), None)
        } else {
            (None, Some(supplement_url))
        };

        // GeoJSON point order is [longitude, latitude].
        let location = GeoCoordinate {
            latitude: record.geometry.coordinates.get(1).copied().unwrap_or(0.0),
            longitude: record.geometry.coordinates.first().copied().unwrap_or(0.0),
        };

        Ok(Entity {
            id: properties.id.clone(),
            name: properties.name.clone(),
            location,
            live_location_enabled: properties.live_location_enabled,
            description: properties.description.clone(),
            portrait_url,
            supplemental_image_url,
            supplemental_movie_url,
            relationship: properties.weight.into(),
            counter_relationship: properties.counter_weight.into(),
            zoom: properties.zoom,
        })
    }

    /// Whether the viewer can edit this entity's canvas
    pub fn is_admin(&self) -> bool {
        self.relationship == Relationship::Admin
    }

    /// Whether this entity hides its canvas from the viewer
    pub fn is_distant(&self) -> bool {
        self.counter_relationship == CounterRelationship::Distant
    }

    /// Identity comparison: entities are equal by id
    pub fn same_as(&self, other: &Entity) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{GeoNodeProperties, MediaRecord, PointGeometry};

    fn record(supplement: &str) -> GeoNodeRecord {
        GeoNodeRecord {
            kind: "Feature".to_string(),
            properties: GeoNodeProperties {
                id: "e1".to_string(),
                name: "Test".to_string(),
                description: String::new(),
                live_location_enabled: None,
                zoom: 2.0,
                media: MediaRecord {
                    portrait_id: "https://example.com/p.jpg".to_string(),
                    supplement_id: supplement.to_string(),
                },
                weight: WeightRecord::Peer,
                counter_weight: CounterWeightRecord::Close,
            },
            geometry: PointGeometry {
                kind: "Point".to_string(),
                coordinates: vec![-76.4735, 42.4534],
            },
        }
    }

    #[test]
    fn test_supplement_image_vs_movie() {
        let image = Entity::from_record(&record("https://example.com/s.png")).unwrap();
        assert!(image.supplemental_image_url.is_some());
        assert!(image.supplemental_movie_url.is_none());

        let movie = Entity::from_record(&record("https://example.com/s.mov")).unwrap();
        assert!(movie.supplemental_image_url.is_none());
        assert!(movie.supplemental_movie_url.is_some());
    }

    #[test]
    fn test_coordinates_are_lon_lat() {
        let entity = Entity::from_record(&record("https://example.com/s.jpg")).unwrap();
        assert_eq!(entity.location.latitude, 42.4534);
        assert_eq!(entity.location.longitude, -76.4735);
    }

    #[test]
    fn test_unknown_media_type_is_decode_error() {
        let err = Entity::from_record(&record("https://example.com/s.gif")).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }
}
