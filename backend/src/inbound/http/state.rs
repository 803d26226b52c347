//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` so they depend only on
//! the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ProfileCommand, ProfileQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub profiles: Arc<dyn ProfileCommand>,
    pub profiles_query: Arc<dyn ProfileQuery>,
}

impl HttpState {
    /// Bundle the profile ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use prowd_backend::domain::ProfileService;
    /// use prowd_backend::inbound::http::state::HttpState;
    /// use prowd_backend::outbound::InMemoryProfileRepository;
    ///
    /// let service = Arc::new(ProfileService::new(Arc::new(InMemoryProfileRepository::new())));
    /// let _state = HttpState::new(service.clone(), service);
    /// ```
    pub fn new(profiles: Arc<dyn ProfileCommand>, profiles_query: Arc<dyn ProfileQuery>) -> Self {
        Self {
            profiles,
            profiles_query,
        }
    }
}
