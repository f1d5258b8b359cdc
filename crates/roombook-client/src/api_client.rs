//! HTTP client for the campus booking backend

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use roombook_core::config::ApiConfig;
use roombook_core::types::{
    Booking, BookingId, BookingStatus, CreateBookingRequest, LoginRequest, RegisterRequest, Room,
    User,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{ClientError, ClientResult};

/// Operations the backend exposes to the client.
///
/// The dashboards only depend on this trait, so they run unchanged against
/// [`ApiClient`] or an in-memory double.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> ClientResult<User>;

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> ClientResult<()>;

    /// `GET /rooms`
    async fn rooms(&self) -> ClientResult<Vec<Room>>;

    /// `GET /users`
    async fn users(&self) -> ClientResult<Vec<User>>;

    /// `GET /bookings`, unfiltered
    async fn bookings(&self) -> ClientResult<Vec<Booking>>;

    /// `POST /bookings`
    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<()>;

    /// `PUT /bookings/{id}/status`
    async fn update_status(&self, id: BookingId, status: BookingStatus) -> ClientResult<()>;

    /// `DELETE /bookings/{id}`
    async fn delete_booking(&self, id: BookingId) -> ClientResult<()>;
}

/// API client for making HTTP requests to the booking backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client without a request timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{path}", self.base_url))
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> ClientResult<String> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "request failed");
            ClientError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            debug!(endpoint, status = status.as_u16(), bytes = body.len(), "request succeeded");
            Ok(body)
        } else {
            warn!(endpoint, status = status.as_u16(), "backend rejected request");
            Err(ClientError::rejected(status.as_u16(), &body))
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let body = self.send(self.request(Method::GET, path), path).await?;
        decode(path, &body)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl BookingApi for ApiClient {
    #[instrument(skip_all, fields(nrp = %request.nrp))]
    async fn login(&self, request: &LoginRequest) -> ClientResult<User> {
        let path = "/auth/login";
        let body = self
            .send(self.request(Method::POST, path).json(request), path)
            .await?;
        decode(path, &body)
    }

    #[instrument(skip_all, fields(nrp = %request.nrp))]
    async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        let path = "/auth/register";
        self.send(self.request(Method::POST, path).json(request), path)
            .await?;
        Ok(())
    }

    async fn rooms(&self) -> ClientResult<Vec<Room>> {
        self.fetch("/rooms").await
    }

    async fn users(&self) -> ClientResult<Vec<User>> {
        self.fetch("/users").await
    }

    async fn bookings(&self) -> ClientResult<Vec<Booking>> {
        self.fetch("/bookings").await
    }

    #[instrument(skip_all, fields(user_id = request.user_id, room_id = request.room_id))]
    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<()> {
        let path = "/bookings";
        self.send(self.request(Method::POST, path).json(request), path)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: BookingId, status: BookingStatus) -> ClientResult<()> {
        let path = format!("/bookings/{id}/status");
        // The body is the bare JSON string, e.g. "Approved".
        self.send(self.request(Method::PUT, &path).json(&status), &path)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_booking(&self, id: BookingId) -> ClientResult<()> {
        let path = format!("/bookings/{id}");
        self.send(self.request(Method::DELETE, &path), &path).await?;
        Ok(())
    }
}
