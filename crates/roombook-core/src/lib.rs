//! Core types and booking classification for the campus room booking client

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod autofill;
pub mod classifier;
pub mod config;
pub mod departments;
pub mod error;
pub mod search;
pub mod types;
pub mod utils;

/// Error context for process bootstrap
pub mod context_error {
    use std::{error::Error as StdError, fmt};

    /// An error wrapped with a message saying what was being attempted
    #[derive(Debug)]
    pub struct ContextError {
        source: Box<dyn StdError + Send + Sync>,
        message: String,
    }

    impl ContextError {
        /// Wrap an existing error with context
        pub fn with_context<E, S>(error: E, message: S) -> Self
        where
            E: StdError + Send + Sync + 'static,
            S: Into<String>,
        {
            Self {
                source: Box::new(error),
                message: message.into(),
            }
        }
    }

    impl fmt::Display for ContextError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}: {}", self.message, self.source)
        }
    }

    impl StdError for ContextError {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(self.source.as_ref() as &(dyn StdError + 'static))
        }
    }

    /// Result type alias for context errors
    pub type Result<T> = std::result::Result<T, ContextError>;
}

// Re-export commonly used types
pub use classifier::{Bucket, Classification, Stats};
pub use config::Config;
pub use error::{Error, Result};
pub use types::{Booking, BookingStatus, DisplayLabel, Lifecycle, Role, Room, User};

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over `level`. Output goes to stderr so command
/// output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(level: &str, json: bool) -> context_error::Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| context_error::ContextError::with_context(e, "logging already initialized"))
}
