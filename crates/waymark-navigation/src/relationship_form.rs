//! Relationship form — adjust the viewer's relationship with the centered
//! entity, or report it

use waymark_core::entity::{Entity, Relationship};
use waymark_core::intent::WriteIntent;

/// Position of the relationship form
#[derive(Debug, Clone, Default)]
pub enum RelationshipFormPosition {
    #[default]
    Blind,
    Update { entity: Entity, host: Entity },
}

/// What the user chose in the form
#[derive(Debug, Clone)]
pub enum RelationshipInput {
    SetRelationship(Relationship),
    Report,
}

impl RelationshipFormPosition {
    pub fn is_blind(&self) -> bool {
        matches!(self, RelationshipFormPosition::Blind)
    }

    /// Build the write intent for this position and input
    pub fn intent(&self, input: RelationshipInput) -> Option<WriteIntent> {
        let (entity, host) = match self {
            RelationshipFormPosition::Update { entity, host } => (entity, host),
            RelationshipFormPosition::Blind => return None,
        };
        match input {
            RelationshipInput::SetRelationship(relationship) => {
                Some(WriteIntent::UpdateRelationship {
                    host: host.clone(),
                    entity: entity.clone(),
                    relationship,
                })
            }
            RelationshipInput::Report => Some(WriteIntent::CreateReport {
                host: host.clone(),
                entity: entity.clone(),
            }),
        }
    }
}
