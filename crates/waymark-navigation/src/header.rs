//! Header controller — the host context above the map and canvas
//!
//! The header shows which host the user is inside and, while exploring,
//! the breadcrumb path of entities walked from the host. Setting the
//! header position carries a contractual reset of its children: the
//! canvas and relationship form follow the centered entity, search always
//! closes, and map presentation snaps to the position's default.

use crate::relationship_form::{RelationshipFormPosition, RelationshipInput};
use parking_lot::Mutex;
use std::sync::Arc;
use waymark_canvas::{CanvasController, CanvasPosition};
use waymark_core::context::AppContext;
use waymark_core::entity::Entity;
use waymark_core::intent::WriteWorkflow;
use waymark_core::notice::Notice;
use waymark_core::{Error, Result};

/// Position of the header
#[derive(Debug, Clone, Default)]
pub enum HeaderPosition {
    /// No host context (signed out, or between hosts).
    #[default]
    Blind,
    /// Inside a host, nothing explored yet.
    Hosted { host: Entity },
    /// Exploring: a non-empty breadcrumb path walked from the host.
    Explored { host: Entity, path: Vec<Entity> },
}

impl HeaderPosition {
    pub fn host(&self) -> Option<&Entity> {
        match self {
            HeaderPosition::Blind => None,
            HeaderPosition::Hosted { host } | HeaderPosition::Explored { host, .. } => Some(host),
        }
    }
}

struct Inner {
    position: HeaderPosition,
    searching: bool,
    presenting_map: bool,
    relationship_form: RelationshipFormPosition,
}

/// Controller for the header and its dependent children
pub struct HeaderController {
    inner: Mutex<Inner>,
    canvas: Arc<CanvasController>,
    context: Arc<AppContext>,
}

impl HeaderController {
    pub fn new(context: Arc<AppContext>, canvas: Arc<CanvasController>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                position: HeaderPosition::Blind,
                searching: false,
                presenting_map: true,
                relationship_form: RelationshipFormPosition::Blind,
            }),
            canvas,
            context,
        }
    }

    /// Transition the header and reset its children
    ///
    /// Panics on an `Explored` position with an empty path: the
    /// coordinator never produces one, so it is a programming error.
    pub fn set_position(&self, position: HeaderPosition) {
        let mut inner = self.inner.lock();
        inner.searching = false;

        match &position {
            HeaderPosition::Blind | HeaderPosition::Hosted { .. } => {
                self.canvas.set_position(CanvasPosition::Blind);
                inner.relationship_form = RelationshipFormPosition::Blind;
                inner.presenting_map = true;
            }
            HeaderPosition::Explored { host, path } => {
                assert!(!path.is_empty(), "explored header with an empty path");
                let entity = path[path.len() - 1].clone();
                self.canvas.set_position(CanvasPosition::Centered {
                    host: host.clone(),
                    entity: entity.clone(),
                });
                inner.relationship_form = RelationshipFormPosition::Update {
                    entity: entity.clone(),
                    host: host.clone(),
                };
                // A distant entity hides its canvas: the map stays up.
                inner.presenting_map = entity.is_distant();
            }
        }
        inner.position = position;
    }

    // --- views -----------------------------------------------------------

    pub fn position(&self) -> HeaderPosition {
        self.inner.lock().position.clone()
    }

    pub fn is_blind(&self) -> bool {
        matches!(self.inner.lock().position, HeaderPosition::Blind)
    }

    pub fn exploring(&self) -> bool {
        matches!(self.inner.lock().position, HeaderPosition::Explored { .. })
    }

    pub fn host(&self) -> Option<Entity> {
        self.inner.lock().position.host().cloned()
    }

    /// The entity whose canvas is centered (last of the explored path)
    pub fn centered_entity(&self) -> Option<Entity> {
        match &self.inner.lock().position {
            HeaderPosition::Explored { path, .. } => path.last().cloned(),
            _ => None,
        }
    }

    pub fn centered_entity_is_host(&self) -> bool {
        match &self.inner.lock().position {
            HeaderPosition::Explored { host, path } => {
                path.last().is_some_and(|entity| entity.same_as(host))
            }
            _ => false,
        }
    }

    pub fn path(&self) -> Vec<Entity> {
        match &self.inner.lock().position {
            HeaderPosition::Explored { path, .. } => path.clone(),
            _ => Vec::new(),
        }
    }

    pub fn searching(&self) -> bool {
        self.inner.lock().searching
    }

    pub fn set_searching(&self, searching: bool) {
        self.inner.lock().searching = searching;
    }

    pub fn presenting_map(&self) -> bool {
        self.inner.lock().presenting_map
    }

    /// Toggle between map and canvas presentation
    ///
    /// A distant centered entity pins the map up; the toggle cannot reveal
    /// a hidden canvas.
    pub fn set_presenting_map(&self, presenting: bool) {
        let mut inner = self.inner.lock();
        let distant = match &inner.position {
            HeaderPosition::Explored { path, .. } => {
                path.last().is_some_and(Entity::is_distant)
            }
            _ => true,
        };
        inner.presenting_map = presenting || distant;
    }

    pub fn relationship_form(&self) -> RelationshipFormPosition {
        self.inner.lock().relationship_form.clone()
    }

    /// Submit the relationship form through the write workflow
    pub async fn submit_relationship(
        &self,
        input: RelationshipInput,
        workflow: &dyn WriteWorkflow,
    ) -> Result<()> {
        let intent = self.inner.lock().relationship_form.intent(input);
        let intent = intent.ok_or_else(|| Error::other("relationship form is blind"))?;

        match workflow.submit(intent).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!(error = %err, "relationship update failed");
                self.context
                    .notices
                    .publish(Notice::titled("Unable to update the relationship"));
                Err(err)
            }
        }
    }
}
