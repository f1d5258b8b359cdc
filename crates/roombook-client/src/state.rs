//! Per-invocation application state

use roombook_core::{Config, User};

use crate::api_client::ApiClient;
use crate::error::ClientResult;
use crate::portal::BookingPortal;
use crate::session::SessionStore;

/// Configuration plus the clients built from it
#[derive(Debug, Clone)]
pub struct AppState {
    /// Resolved configuration
    pub config: Config,
    /// HTTP client for the booking backend
    pub api: ApiClient,
    /// Session persistence
    pub session: SessionStore,
}

impl AppState {
    /// Build the clients described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: Config) -> ClientResult<Self> {
        let api = ApiClient::from_config(&config.api)?;
        let session = SessionStore::from_config(config.session.path.as_deref());
        Ok(Self {
            config,
            api,
            session,
        })
    }

    /// Portal for the stored session
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when nobody is logged in.
    pub fn portal(&self) -> ClientResult<BookingPortal<ApiClient>> {
        let user = self.session.require_user()?;
        Ok(self.portal_for(user))
    }

    /// Portal for an administrator session
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` unless an admin is logged in.
    pub fn admin_portal(&self) -> ClientResult<BookingPortal<ApiClient>> {
        let user = self.session.require_admin()?;
        Ok(self.portal_for(user))
    }

    fn portal_for(&self, user: User) -> BookingPortal<ApiClient> {
        BookingPortal::new(self.api.clone(), user)
    }
}
