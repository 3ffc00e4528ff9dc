//! Session state and sign-in/out attempts

use parking_lot::Mutex;
use std::sync::Arc;
use waymark_core::context::AppContext;
use waymark_core::entity::Entity;
use waymark_core::notice::Notice;

/// Where the user stands with the session
#[derive(Debug, Clone, Default)]
pub enum AuthPosition {
    #[default]
    Unauthenticated,
    /// An organization was selected and the sign-in sheet is up.
    Candidate { organization: Entity },
    Authenticated,
}

impl AuthPosition {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthPosition::Authenticated)
    }

    pub fn is_candidate(&self) -> bool {
        matches!(self, AuthPosition::Candidate { .. })
    }
}

/// Holds the auth position and runs session attempts
///
/// Attempts never move the position themselves: success is reported back
/// to the coordinator, which issues the transition. A failed attempt is
/// operational — notice, log, no retry.
pub struct Authenticator {
    position: Mutex<AuthPosition>,
    context: Arc<AppContext>,
}

impl Authenticator {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self {
            position: Mutex::new(AuthPosition::Unauthenticated),
            context,
        }
    }

    pub fn position(&self) -> AuthPosition {
        self.position.lock().clone()
    }

    pub fn set_position(&self, position: AuthPosition) {
        *self.position.lock() = position;
    }

    /// Run the sign-in probe; true means the session is now live
    pub async fn attempt_sign_in(&self) -> bool {
        let ok = self.context.session.sign_in().await;
        if !ok {
            tracing::warn!("sign-in attempt failed");
            self.context
                .notices
                .publish(Notice::titled("Unable to sign in"));
        }
        ok
    }

    /// Run the sign-out probe; true means the session ended
    pub async fn attempt_sign_out(&self) -> bool {
        let ok = self.context.session.sign_out().await;
        if !ok {
            tracing::warn!("sign-out attempt failed");
            self.context
                .notices
                .publish(Notice::titled("Unable to sign out"));
        }
        ok
    }

    /// Boot probe: whether a session is already live at launch
    pub async fn probe(&self) -> bool {
        self.context.session.is_signed_in().await
    }
}
