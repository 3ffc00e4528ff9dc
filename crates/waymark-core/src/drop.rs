//! Drops — content placed on an entity's canvas
//!
//! A drop is an image ("abstraction"), a portal link, or a reference to
//! another entity, anchored at a 3D canvas coordinate. Raw records are
//! classified into exactly one variant; records that fit none are silently
//! discarded, never surfaced as errors.

use crate::entity::Entity;
use crate::location::Location3D;
use crate::records::DropRecord;
use std::cmp::Ordering;
use url::Url;

/// Display radius of a portal drop, in canvas units at z = 1.
pub const PORTAL_RADIUS: f64 = 20.0;
/// Display radius of an entity drop.
pub const ENTITY_RADIUS: f64 = 20.0;
/// Display radius of an abstraction drop.
pub const ABSTRACTION_RADIUS: f64 = 125.0;

/// The kind of a drop, used for radius lookup and placement rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Abstraction,
    Portal,
    Entity,
}

impl DropKind {
    /// Unscaled display radius for this kind
    pub fn radius(self) -> f64 {
        match self {
            DropKind::Abstraction => ABSTRACTION_RADIUS,
            DropKind::Portal => PORTAL_RADIUS,
            DropKind::Entity => ENTITY_RADIUS,
        }
    }
}

/// An image placed on the canvas
#[derive(Debug, Clone)]
pub struct DroppedAbstraction {
    pub id: String,
    pub location: Location3D,
    pub image_url: Url,
}

/// A link placed on the canvas
#[derive(Debug, Clone)]
pub struct DroppedPortal {
    pub id: String,
    pub location: Location3D,
    pub url: Url,
}

/// A reference to another entity placed on the canvas
#[derive(Debug, Clone)]
pub struct DroppedEntity {
    pub id: String,
    pub location: Location3D,
    pub entity: Entity,
}

/// A placed annotation, closed over its three variants
#[derive(Debug, Clone)]
pub enum Dropped {
    Abstraction(DroppedAbstraction),
    Portal(DroppedPortal),
    Entity(DroppedEntity),
}

impl Dropped {
    /// Classify a raw record into a drop
    ///
    /// Attempts Abstraction, then Portal, then Entity — a record satisfying
    /// multiple shapes takes the first match. Returns `None` for records
    /// matching none (invalid location, unparsable urls, missing payload);
    /// such records are dropped without error.
    pub fn classify(record: &DropRecord) -> Option<Dropped> {
        let location = Location3D::from_components(&record.canvas_location)?;

        if let Some(image_id) = &record.image_id {
            if let Ok(image_url) = Url::parse(image_id) {
                return Some(Dropped::Abstraction(DroppedAbstraction {
                    id: record.id.clone(),
                    location,
                    image_url,
                }));
            }
        }
        if let Some(portal) = &record.portal_url {
            if let Ok(url) = Url::parse(portal) {
                return Some(Dropped::Portal(DroppedPortal {
                    id: record.id.clone(),
                    location,
                    url,
                }));
            }
        }
        if let Some(node) = &record.geo_node {
            if let Ok(entity) = Entity::from_record(node) {
                return Some(Dropped::Entity(DroppedEntity {
                    id: record.id.clone(),
                    location,
                    entity,
                }));
            }
        }
        None
    }

    pub fn id(&self) -> &str {
        match self {
            Dropped::Abstraction(d) => &d.id,
            Dropped::Portal(d) => &d.id,
            Dropped::Entity(d) => &d.id,
        }
    }

    pub fn location(&self) -> Location3D {
        match self {
            Dropped::Abstraction(d) => d.location,
            Dropped::Portal(d) => d.location,
            Dropped::Entity(d) => d.location,
        }
    }

    pub fn kind(&self) -> DropKind {
        match self {
            Dropped::Abstraction(_) => DropKind::Abstraction,
            Dropped::Portal(_) => DropKind::Portal,
            Dropped::Entity(_) => DropKind::Entity,
        }
    }
}

/// Stable layout-priority sort over a drop set
///
/// Ascending (`decreasing = false`) puts the nearest drop first and is the
/// hit-testing precedence; descending puts the furthest first and is the
/// paint order. The result of one is the reverse of the other up to ties,
/// which keep input order either way.
pub fn sort_by_layout_priority(drops: &mut [Dropped], decreasing: bool) {
    drops.sort_by(|a, b| {
        let ord = a.location().layout_cmp(&b.location());
        if decreasing {
            // Keep ties Equal so the sort stays stable in both directions.
            match ord {
                Ordering::Equal => Ordering::Equal,
                other => other.reverse(),
            }
        } else {
            ord
        }
    });
}
