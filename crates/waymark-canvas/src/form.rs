//! Drop form — the child workflow that turns a confirmed studio action
//! into a write intent

use url::Url;
use waymark_core::entity::Entity;
use waymark_core::intent::{DropPayload, WriteIntent};
use waymark_core::location::Location3D;
use waymark_core::Dropped;

/// Position of the drop form workflow
#[derive(Debug, Clone, Default)]
pub enum DropFormPosition {
    #[default]
    Blind,
    DropAbstraction {
        location: Location3D,
        host: Entity,
    },
    DropEntity {
        location: Location3D,
        host: Entity,
    },
    DropPortal {
        location: Location3D,
        host: Entity,
    },
    Lift {
        drop: Dropped,
        host: Entity,
    },
}

/// What the user supplied to the form before confirming
#[derive(Debug, Clone)]
pub enum FormInput {
    /// An uploaded image, referenced by url.
    Image { image_url: Url },
    /// Another entity to reference.
    Entity { entity: Entity },
    /// A link.
    Portal { url: Url },
    /// Bare confirmation (lifts carry no payload).
    Confirm,
}

impl DropFormPosition {
    pub fn is_blind(&self) -> bool {
        matches!(self, DropFormPosition::Blind)
    }

    pub fn host(&self) -> Option<&Entity> {
        match self {
            DropFormPosition::Blind => None,
            DropFormPosition::DropAbstraction { host, .. }
            | DropFormPosition::DropEntity { host, .. }
            | DropFormPosition::DropPortal { host, .. }
            | DropFormPosition::Lift { host, .. } => Some(host),
        }
    }

    /// Build the write intent for this form position and input
    ///
    /// Returns `None` when the form is blind or the input does not match
    /// the position's expected payload.
    pub fn intent(&self, input: FormInput) -> Option<WriteIntent> {
        match (self, input) {
            (
                DropFormPosition::DropAbstraction { location, host },
                FormInput::Image { image_url },
            ) => Some(WriteIntent::CreateDrop {
                host: host.clone(),
                location: *location,
                payload: DropPayload::Abstraction { image_url },
            }),
            (DropFormPosition::DropEntity { location, host }, FormInput::Entity { entity }) => {
                Some(WriteIntent::CreateDrop {
                    host: host.clone(),
                    location: *location,
                    payload: DropPayload::Entity { entity },
                })
            }
            (DropFormPosition::DropPortal { location, host }, FormInput::Portal { url }) => {
                Some(WriteIntent::CreateDrop {
                    host: host.clone(),
                    location: *location,
                    payload: DropPayload::Portal { url },
                })
            }
            (DropFormPosition::Lift { drop, host }, FormInput::Confirm) => {
                Some(WriteIntent::DeleteDrop {
                    host: host.clone(),
                    drop_id: drop.id().to_string(),
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::entity::{CounterRelationship, GeoCoordinate, Relationship};

    fn entity(id: &str) -> Entity {
        Entity {
            id: id.to_string(),
            name: id.to_string(),
            location: GeoCoordinate {
                latitude: 0.0,
                longitude: 0.0,
            },
            live_location_enabled: None,
            description: String::new(),
            portrait_url: Url::parse("https://example.com/p.jpg").unwrap(),
            supplemental_image_url: None,
            supplemental_movie_url: None,
            relationship: Relationship::Admin,
            counter_relationship: CounterRelationship::Close,
            zoom: 2.0,
        }
    }

    #[test]
    fn test_portal_form_builds_create_intent() {
        let form = DropFormPosition::DropPortal {
            location: Location3D::new(250.0, 250.0, 1.0),
            host: entity("h"),
        };
        let intent = form
            .intent(FormInput::Portal {
                url: Url::parse("https://example.com/").unwrap(),
            })
            .unwrap();
        assert!(matches!(
            intent,
            WriteIntent::CreateDrop {
                payload: DropPayload::Portal { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_mismatched_input_yields_no_intent() {
        let form = DropFormPosition::DropPortal {
            location: Location3D::new(250.0, 250.0, 1.0),
            host: entity("h"),
        };
        assert!(form.intent(FormInput::Confirm).is_none());
        assert!(DropFormPosition::Blind
            .intent(FormInput::Portal {
                url: Url::parse("https://example.com/").unwrap(),
            })
            .is_none());
    }
}
