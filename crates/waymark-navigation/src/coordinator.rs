//! Navigation coordinator
//!
//! The whole app's navigation is a state machine over three positions:
//! the map, the header (host context), and the session. `transition` is a
//! pure function from (state, event) to the next state plus the ordered
//! child commands that realize it, so every navigation rule is testable
//! without controllers, tasks, or mocks. The [`Coordinator`] driver owns
//! the controllers and applies the commands.
//!
//! Event preconditions are panics, not errors: an event arriving in a
//! state that cannot produce it means a view kept a stale handle, and
//! continuing would desynchronize every child below.

use crate::auth::{AuthPosition, Authenticator};
use crate::header::{HeaderController, HeaderPosition};
use parking_lot::Mutex;
use std::sync::Arc;
use waymark_canvas::CanvasController;
use waymark_core::context::AppContext;
use waymark_core::entity::Entity;
use waymark_map::{MapController, MapPosition};

/// The three positions that together locate the user in the app
#[derive(Debug, Clone, Default)]
pub struct NavState {
    pub map: MapPosition,
    pub header: HeaderPosition,
    pub auth: AuthPosition,
}

/// Everything that can move the navigation
#[derive(Debug, Clone)]
pub enum NavEvent {
    /// An organization annotation was tapped on the public map.
    OrganizationSelected { organization: Entity },
    /// The sign-in sheet was dismissed.
    SignInCancelled,
    /// The session probe succeeded for the candidate organization.
    SignInSucceeded,
    /// A host annotation was tapped.
    HostSelected { host: Entity },
    /// An entity was selected from the map, canvas, or search.
    EntitySelected { entity: Entity },
    /// The globe button: back to the host's network view.
    GlobeSelected,
    /// The session ended.
    SignedOut,
    /// The host context was left.
    HostExited,
}

/// A directed child reset
///
/// Each command implies the child's contractual reset set (the header
/// resets the canvas and relationship form, the map resets its batcher
/// and feature store).
#[derive(Debug, Clone)]
pub enum Command {
    SetMapPosition(MapPosition),
    SetHeaderPosition(HeaderPosition),
    SetAuthPosition(AuthPosition),
}

/// Result of one transition: the next state and the commands realizing it
#[derive(Debug, Clone)]
pub struct Transition {
    pub next: NavState,
    pub commands: Vec<Command>,
}

impl Transition {
    fn new(next: NavState, commands: Vec<Command>) -> Self {
        Self { next, commands }
    }
}

/// Compute the next navigation state for an event
pub fn transition(state: &NavState, event: NavEvent) -> Transition {
    match event {
        NavEvent::OrganizationSelected { organization } => {
            assert!(
                matches!(state.auth, AuthPosition::Unauthenticated),
                "organization selected outside the public map"
            );
            let auth = AuthPosition::Candidate { organization };
            Transition::new(
                NavState {
                    auth: auth.clone(),
                    ..state.clone()
                },
                vec![Command::SetAuthPosition(auth)],
            )
        }
        NavEvent::SignInCancelled => {
            assert!(
                state.auth.is_candidate(),
                "sign-in cancelled without a candidate"
            );
            let auth = AuthPosition::Unauthenticated;
            Transition::new(
                NavState {
                    auth: auth.clone(),
                    ..state.clone()
                },
                vec![Command::SetAuthPosition(auth)],
            )
        }
        NavEvent::SignInSucceeded => {
            assert!(
                state.auth.is_candidate(),
                "sign-in succeeded without a candidate"
            );
            let next = NavState {
                map: MapPosition::Hosts,
                header: HeaderPosition::Blind,
                auth: AuthPosition::Authenticated,
            };
            Transition::new(
                next.clone(),
                vec![
                    Command::SetAuthPosition(next.auth.clone()),
                    Command::SetHeaderPosition(next.header.clone()),
                    Command::SetMapPosition(next.map.clone()),
                ],
            )
        }
        NavEvent::HostSelected { host } => {
            assert!(
                state.auth.is_authenticated(),
                "host selected while signed out"
            );
            assert!(
                matches!(state.map, MapPosition::Hosts | MapPosition::Links { .. }),
                "host selected outside the hosts or links map"
            );
            let header_allows = match &state.header {
                HeaderPosition::Blind => true,
                HeaderPosition::Hosted { .. } => false,
                HeaderPosition::Explored { host: current, path } => {
                    path.last().is_some_and(|entity| entity.same_as(current))
                }
            };
            assert!(header_allows, "host selected while exploring another entity");
            let next = NavState {
                map: MapPosition::Network { host: host.clone() },
                header: HeaderPosition::Hosted { host },
                auth: AuthPosition::Authenticated,
            };
            Transition::new(
                next.clone(),
                vec![
                    Command::SetHeaderPosition(next.header.clone()),
                    Command::SetMapPosition(next.map.clone()),
                ],
            )
        }
        NavEvent::EntitySelected { entity } => {
            assert!(
                state.auth.is_authenticated(),
                "entity selected while signed out"
            );
            let (host, current_path) = match &state.header {
                HeaderPosition::Hosted { host } => (host.clone(), Vec::new()),
                HeaderPosition::Explored { host, path } => (host.clone(), path.clone()),
                HeaderPosition::Blind => panic!("entity selected without a host context"),
            };
            assert!(
                matches!(state.map, MapPosition::Network { .. } | MapPosition::Links { .. }),
                "entity selected outside a network or links map"
            );
            let path = updated_entity_path(&host, &current_path, entity);
            // Non-empty by construction.
            let centered = path[path.len() - 1].clone();
            let next = NavState {
                map: MapPosition::Links {
                    entity: centered,
                    host: host.clone(),
                },
                header: HeaderPosition::Explored { host, path },
                auth: state.auth.clone(),
            };
            Transition::new(
                next.clone(),
                vec![
                    Command::SetHeaderPosition(next.header.clone()),
                    Command::SetMapPosition(next.map.clone()),
                ],
            )
        }
        NavEvent::GlobeSelected => {
            // The globe button only exists while an entity is centered.
            let host = match &state.header {
                HeaderPosition::Explored { host, .. } => host.clone(),
                _ => panic!("globe selected without an explored path"),
            };
            let next = NavState {
                map: MapPosition::Network { host: host.clone() },
                header: HeaderPosition::Hosted { host },
                auth: state.auth.clone(),
            };
            Transition::new(
                next.clone(),
                vec![
                    Command::SetHeaderPosition(next.header.clone()),
                    Command::SetMapPosition(next.map.clone()),
                ],
            )
        }
        NavEvent::SignedOut => {
            assert!(
                state.auth.is_authenticated(),
                "signed out while already signed out"
            );
            let next = NavState {
                map: MapPosition::Organizations,
                header: HeaderPosition::Blind,
                auth: AuthPosition::Unauthenticated,
            };
            Transition::new(
                next.clone(),
                vec![
                    Command::SetHeaderPosition(next.header.clone()),
                    Command::SetAuthPosition(next.auth.clone()),
                    Command::SetMapPosition(next.map.clone()),
                ],
            )
        }
        NavEvent::HostExited => {
            assert!(
                state.header.host().is_some(),
                "host exited without a host context"
            );
            let next = NavState {
                map: MapPosition::Hosts,
                header: HeaderPosition::Blind,
                auth: state.auth.clone(),
            };
            Transition::new(
                next.clone(),
                vec![
                    Command::SetHeaderPosition(next.header.clone()),
                    Command::SetMapPosition(next.map.clone()),
                ],
            )
        }
    }
}

/// The breadcrumb path after selecting `entity` under `host`
///
/// Selecting the host collapses the path to just the host. Selecting an
/// entity already on the path truncates everything after it, landing it
/// last. Anything else appends.
pub fn updated_entity_path(host: &Entity, path: &[Entity], entity: Entity) -> Vec<Entity> {
    if entity.same_as(host) {
        return vec![entity];
    }
    if let Some(index) = path.iter().position(|step| step.same_as(&entity)) {
        let mut updated = path[..index].to_vec();
        updated.push(entity);
        return updated;
    }
    let mut updated = path.to_vec();
    updated.push(entity);
    updated
}

/// Owns the child controllers and drives them from navigation events
pub struct Coordinator {
    state: Mutex<NavState>,
    map: Arc<MapController>,
    header: Arc<HeaderController>,
    canvas: Arc<CanvasController>,
    auth: Arc<Authenticator>,
}

impl Coordinator {
    pub fn new(context: Arc<AppContext>) -> Self {
        let canvas = Arc::new(CanvasController::new(Arc::clone(&context)));
        let header = Arc::new(HeaderController::new(
            Arc::clone(&context),
            Arc::clone(&canvas),
        ));
        let map = Arc::new(MapController::new(Arc::clone(&context)));
        let auth = Arc::new(Authenticator::new(context));
        Self {
            state: Mutex::new(NavState::default()),
            map,
            header,
            canvas,
            auth,
        }
    }

    /// Apply one navigation event
    pub fn handle(&self, event: NavEvent) {
        let mut state = self.state.lock();
        tracing::debug!(?event, "navigation event");
        let Transition { next, commands } = transition(&state, event);
        *state = next;
        for command in commands {
            match command {
                Command::SetMapPosition(position) => self.map.set_position(position),
                Command::SetHeaderPosition(position) => self.header.set_position(position),
                Command::SetAuthPosition(position) => self.auth.set_position(position),
            }
        }
    }

    /// Launch-time probe: resume the session or show the public map
    pub async fn boot(&self) {
        if self.auth.probe().await {
            let mut state = self.state.lock();
            *state = NavState {
                map: MapPosition::Hosts,
                header: HeaderPosition::Blind,
                auth: AuthPosition::Authenticated,
            };
            self.auth.set_position(AuthPosition::Authenticated);
            self.header.set_position(HeaderPosition::Blind);
            self.map.set_position(MapPosition::Hosts);
        } else {
            self.map.set_position(MapPosition::Organizations);
        }
    }

    /// Run the sign-in attempt for the current candidate
    pub async fn attempt_sign_in(&self) {
        if self.auth.attempt_sign_in().await {
            self.handle(NavEvent::SignInSucceeded);
        }
    }

    /// Run the sign-out attempt
    pub async fn attempt_sign_out(&self) {
        if self.auth.attempt_sign_out().await {
            self.handle(NavEvent::SignedOut);
        }
    }

    pub fn state(&self) -> NavState {
        self.state.lock().clone()
    }

    pub fn map(&self) -> &Arc<MapController> {
        &self.map
    }

    pub fn header(&self) -> &Arc<HeaderController> {
        &self.header
    }

    pub fn canvas(&self) -> &Arc<CanvasController> {
        &self.canvas
    }

    pub fn auth(&self) -> &Arc<Authenticator> {
        &self.auth
    }
}
