//! Campus room booking client
//!
//! Talks to the booking REST backend on behalf of a logged-in student or
//! administrator: listings and dashboards, booking requests, cancellation,
//! review, and booking on behalf of another user.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod auth;
pub mod error;
pub mod mock;
pub mod portal;
pub mod render;
pub mod session;
pub mod state;

pub use api_client::{ApiClient, BookingApi};
pub use error::{ClientError, ClientResult};
pub use portal::{AdminDashboard, BookingDraft, BookingPortal, StudentDashboard};
pub use session::SessionStore;
pub use state::AppState;
