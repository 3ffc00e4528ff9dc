//! Shared application context
//!
//! One `AppContext` is constructed per process and handed by reference to
//! every component that needs network access or notice publishing. Nothing
//! in the core reaches for ambient global state.

use crate::client::{ApiClient, SessionProbe};
use crate::notice::Notices;
use std::sync::Arc;

/// Process-wide collaborators, passed explicitly
pub struct AppContext {
    pub api: Arc<dyn ApiClient>,
    pub session: Arc<dyn SessionProbe>,
    pub notices: Arc<Notices>,
}

impl AppContext {
    pub fn new(api: Arc<dyn ApiClient>, session: Arc<dyn SessionProbe>) -> Arc<Self> {
        Arc::new(Self {
            api,
            session,
            notices: Arc::new(Notices::new()),
        })
    }
}
