//! # FCoder Client
//!
//! Talks to the FCoder backend's authentication endpoints and drives the
//! login and signup forms on top of [`fcoder_validate`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use fcoder_client::prelude::*;
//!
//! let config = ClientConfig::load()?;
//! init_tracing(&Environment::current());
//!
//! let api = HttpAuthApi::new(&config)?;
//! let form = LoginSession::new();
//! form.change(LoginField::Username, "fcoder_member");
//! form.change(LoginField::Password, "Secret123");
//!
//! match form.submit(&api).await {
//!     SubmitOutcome::Success(token) => println!("logged in: {token}"),
//!     outcome => println!("errors: {:?}", outcome.errors()),
//! }
//! ```
//!
//! ## Configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `FCODER_API_ENDPOINT` | required |
//! | `FCODER_REQUEST_TIMEOUT_MS` | `10000` |
//! | `FCODER_ENV` | `development` |
//! | `RUST_LOG` | from `FCODER_ENV` |

pub mod auth;
pub mod config;
pub mod error;
pub mod payload;
pub mod session;
pub mod telemetry;


pub use auth::{ApiResponse, AuthApi, HttpAuthApi, LoginSuccess};
pub use config::{ClientConfig, ConfigError, Environment};
pub use error::{ClientError, Result};
pub use payload::SignupPayload;
pub use session::{
    FormLifetime, LoginField, LoginSession, Registered, SignupField, SignupSession,
    SubmitOutcome, UnknownField,
};
pub use telemetry::init_tracing;

/// Prelude module for client usage
pub mod prelude {
    pub use crate::auth::{ApiResponse, AuthApi, HttpAuthApi};
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::error::ClientError;
    pub use crate::session::{
        FormLifetime, LoginField, LoginSession, SignupField, SignupSession, SubmitOutcome,
    };
    pub use crate::telemetry::init_tracing;
    pub use fcoder_validate::prelude::*;
}
