//! Canvas controller
//!
//! Owns the studio mode and the drop registry for the centered entity,
//! answers whether the cursor is currently actionable, and routes
//! confirmed actions through the drop form into write intents.
//!
//! Concurrency: all state mutates under one lock on a single logical
//! timeline. Position changes abort the in-flight drop load and bump the
//! registry generation before the new load starts; a superseded load's
//! completion is discarded on arrival.

use crate::form::{DropFormPosition, FormInput};
use crate::placement;
use crate::registry::{classify_records, DropRegistry};
use crate::studio::Studio;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use waymark_core::context::AppContext;
use waymark_core::entity::Entity;
use waymark_core::intent::WriteWorkflow;
use waymark_core::location::Location3D;
use waymark_core::notice::Notice;
use waymark_core::{Dropped, Error, Result};

/// Position of the canvas controller
#[derive(Debug, Clone, Default)]
pub enum CanvasPosition {
    #[default]
    Blind,
    Centered {
        host: Entity,
        entity: Entity,
    },
}

struct Inner {
    position: CanvasPosition,
    studio: Studio,
    cursor: Location3D,
    registry: DropRegistry,
    form: DropFormPosition,
    loader: Option<JoinHandle<()>>,
}

/// Controller for the interactive canvas of the centered entity
pub struct CanvasController {
    inner: Arc<Mutex<Inner>>,
    context: Arc<AppContext>,
}

impl CanvasController {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                position: CanvasPosition::Blind,
                studio: Studio::Inactive,
                cursor: placement::content_center(),
                registry: DropRegistry::new(),
                form: DropFormPosition::Blind,
                loader: None,
            })),
            context,
        }
    }

    /// Transition the canvas to a new position
    ///
    /// Cancels the in-flight drop load, clears the registry (so stale
    /// results can never land), resets the form, enforces the admin gate
    /// on the studio, and starts the new load — unless the centered
    /// entity's counter-relationship is Distant, in which case the
    /// registry stays empty and no load is ever issued.
    pub fn set_position(&self, position: CanvasPosition) {
        let mut inner = self.inner.lock();
        if let Some(loader) = inner.loader.take() {
            loader.abort();
        }
        let generation = inner.registry.begin_load();
        inner.form = DropFormPosition::Blind;

        match &position {
            CanvasPosition::Centered { host, entity } => {
                if !entity.is_admin() {
                    inner.studio = Studio::Inactive;
                }
                if entity.is_distant() {
                    // Hidden canvas: no load, and no studio regardless of
                    // the viewer's own relationship.
                    inner.studio = Studio::Inactive;
                    inner.position = position.clone();
                    return;
                }
                let host = host.clone();
                let entity = entity.clone();
                inner.position = position.clone();
                inner.loader = Some(self.spawn_load(host, entity, generation));
            }
            CanvasPosition::Blind => {
                inner.studio = Studio::Inactive;
                inner.position = CanvasPosition::Blind;
            }
        }
    }

    /// Reload the drop set for the current pair (called after a canvas
    /// write was fulfilled)
    pub fn reload(&self) {
        let mut inner = self.inner.lock();
        let (host, entity) = match &inner.position {
            CanvasPosition::Centered { host, entity } => (host.clone(), entity.clone()),
            CanvasPosition::Blind => return,
        };
        if let Some(loader) = inner.loader.take() {
            loader.abort();
        }
        let generation = inner.registry.begin_load();
        if entity.is_distant() {
            return;
        }
        inner.loader = Some(self.spawn_load(host, entity, generation));
    }

    fn spawn_load(&self, host: Entity, entity: Entity, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let context = Arc::clone(&self.context);
        tokio::spawn(async move {
            match context.api.load_drops(&host, &entity).await {
                Ok(records) => {
                    let outcome = classify_records(&records);
                    if outcome.rejected > 0 {
                        tracing::debug!(
                            rejected = outcome.rejected,
                            entity = %entity.id,
                            "dropped unclassifiable records"
                        );
                    }
                    let mut inner = inner.lock();
                    if !inner.registry.complete(generation, outcome.accepted) {
                        tracing::debug!(entity = %entity.id, "discarded superseded drop load");
                    }
                }
                Err(err) => {
                    tracing::error!(entity = %entity.id, error = %err, "drop load failed");
                    context.notices.publish(Notice::titled("Unable to load drops"));
                }
            }
        })
    }

    // --- views -----------------------------------------------------------

    pub fn position(&self) -> CanvasPosition {
        self.inner.lock().position.clone()
    }

    pub fn is_blind(&self) -> bool {
        matches!(self.inner.lock().position, CanvasPosition::Blind)
    }

    pub fn host(&self) -> Option<Entity> {
        match &self.inner.lock().position {
            CanvasPosition::Centered { host, .. } => Some(host.clone()),
            CanvasPosition::Blind => None,
        }
    }

    pub fn entity(&self) -> Option<Entity> {
        match &self.inner.lock().position {
            CanvasPosition::Centered { entity, .. } => Some(entity.clone()),
            CanvasPosition::Blind => None,
        }
    }

    pub fn studio(&self) -> Studio {
        self.inner.lock().studio
    }

    pub fn cursor(&self) -> Location3D {
        self.inner.lock().cursor
    }

    /// Drops in hit-test order (nearest first)
    pub fn hit_order(&self) -> Vec<Dropped> {
        self.inner.lock().registry.hit_order()
    }

    /// Drops in paint order (furthest first)
    pub fn paint_order(&self) -> Vec<Dropped> {
        self.inner.lock().registry.paint_order()
    }

    pub fn drop_count(&self) -> usize {
        self.inner.lock().registry.len()
    }

    pub fn form(&self) -> DropFormPosition {
        self.inner.lock().form.clone()
    }

    // --- interaction ------------------------------------------------------

    /// Update the cursor location (the center of the viewport in canvas
    /// space, with z the current zoom factor)
    pub fn set_cursor(&self, location: Location3D) {
        self.inner.lock().cursor = location;
    }

    /// Tap on the studio cursor: advance to the next mode
    ///
    /// Only admins of the centered entity can open the studio; in any
    /// other context the studio pins to Inactive.
    pub fn advance_studio(&self) {
        let mut inner = self.inner.lock();
        let admin = matches!(
            &inner.position,
            CanvasPosition::Centered { entity, .. } if entity.is_admin() && !entity.is_distant()
        );
        inner.studio = if admin {
            inner.studio.advanced()
        } else {
            Studio::Inactive
        };
    }

    /// Whether the current cursor position can perform the studio's action
    pub fn actionable(&self) -> bool {
        let inner = self.inner.lock();
        match inner.studio {
            Studio::Inactive => false,
            Studio::DroppingAbstraction => placement::in_content_circle(inner.cursor, 0.0),
            Studio::DroppingEntity | Studio::DroppingPortal => {
                !placement::within_proximity(inner.cursor, inner.registry.drops())
            }
            Studio::Lifting => {
                placement::targeted_drop(inner.cursor, inner.registry.drops()).is_some()
            }
        }
    }

    /// The drop a lift at the current cursor would remove
    pub fn targeted_drop(&self) -> Option<Dropped> {
        let inner = self.inner.lock();
        placement::targeted_drop(inner.cursor, inner.registry.drops())
    }

    /// Confirm the studio's action: open the drop form
    ///
    /// Returns the form position entered, or `None` when the cursor is not
    /// actionable. Panics if the canvas is blind — the studio is only
    /// reachable with a centered entity, so a blind confirm is a
    /// coordinator desynchronization bug.
    pub fn begin_action(&self) -> Option<DropFormPosition> {
        if !self.actionable() {
            return None;
        }
        let mut inner = self.inner.lock();
        let host = match &inner.position {
            CanvasPosition::Centered { host, .. } => host.clone(),
            CanvasPosition::Blind => {
                panic!("studio action confirmed without a centered entity")
            }
        };
        let form = match inner.studio {
            Studio::Inactive => return None,
            Studio::DroppingAbstraction => DropFormPosition::DropAbstraction {
                location: inner.cursor,
                host,
            },
            Studio::DroppingEntity => DropFormPosition::DropEntity {
                location: inner.cursor,
                host,
            },
            Studio::DroppingPortal => DropFormPosition::DropPortal {
                location: inner.cursor,
                host,
            },
            Studio::Lifting => {
                let drop = placement::targeted_drop(inner.cursor, inner.registry.drops())?;
                DropFormPosition::Lift { drop, host }
            }
        };
        inner.form = form.clone();
        Some(form)
    }

    /// Dismiss the form without submitting
    pub fn cancel_form(&self) {
        self.inner.lock().form = DropFormPosition::Blind;
    }

    /// Submit the open form through the write workflow
    ///
    /// On success the form closes and the drop set reloads for the current
    /// pair. On failure a notice surfaces and prior state stays put.
    pub async fn submit_form(
        &self,
        input: FormInput,
        workflow: &dyn WriteWorkflow,
    ) -> Result<()> {
        let intent = {
            let inner = self.inner.lock();
            inner.form.intent(input)
        };
        let intent = intent.ok_or_else(|| Error::other("form input does not match position"))?;

        match workflow.submit(intent).await {
            Ok(()) => {
                self.inner.lock().form = DropFormPosition::Blind;
                self.reload();
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "drop form submission failed");
                self.context
                    .notices
                    .publish(Notice::titled("Unable to update canvas"));
                Err(err)
            }
        }
    }
}
