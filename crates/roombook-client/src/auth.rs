//! Login, registration and logout

use roombook_core::User;
use roombook_core::types::{LoginRequest, RegisterRequest};
use tracing::info;
use validator::Validate;

use crate::api_client::BookingApi;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;

/// Authenticate against the backend and persist the returned user
///
/// # Errors
///
/// Returns an error if the form is incomplete, the backend rejects the
/// credentials, or the session cannot be written.
pub async fn login<A: BookingApi + ?Sized>(
    api: &A,
    store: &SessionStore,
    nrp: &str,
    password: &str,
) -> ClientResult<User> {
    let request = LoginRequest {
        nrp: nrp.trim().to_string(),
        password: password.to_string(),
    };
    request.validate()?;

    let user = api.login(&request).await.map_err(|e| match e {
        ClientError::Rejected { status, .. } => ClientError::Rejected {
            status,
            message: "Login Gagal: NRP atau Password salah.".to_string(),
        },
        other => other,
    })?;

    store.save(&user)?;
    info!(user = %user.name, admin = user.role.is_admin(), "logged in");
    Ok(user)
}

/// Create a student account. The caller logs in separately afterwards.
///
/// # Errors
///
/// Returns an error if validation fails or the backend rejects the request.
pub async fn register<A: BookingApi + ?Sized>(api: &A, request: &RegisterRequest) -> ClientResult<()> {
    request.validate()?;
    api.register(request).await?;
    info!(nrp = %request.nrp, "registered");
    Ok(())
}

/// Drop the stored session
///
/// # Errors
///
/// Returns an error if the session file exists but cannot be removed.
pub fn logout(store: &SessionStore) -> ClientResult<()> {
    store.clear()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::MockBookingApi;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_login_saves_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = MockBookingApi::with_sample_data();

        let user = login(&api, &store, " 123 ", "alice-pw").await.unwrap();

        assert_eq!(user.name, "Alice");
        assert_eq!(store.load().unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_login_wrong_password_keeps_logged_out() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = MockBookingApi::with_sample_data();

        let err = login(&api, &store, "123", "nope").await.unwrap_err();

        assert_eq!(err.to_string(), "Login Gagal: NRP atau Password salah.");
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = MockBookingApi::with_sample_data();

        let err = login(&api, &store, "", "x").await.unwrap_err();
        assert!(err.is_local());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        logout(&store).unwrap();
        logout(&store).unwrap();
    }
}
