//! Test support for FCoder clients.
//!
//! [`MockBackend`] serves scripted answers for the FCoder authentication
//! endpoints on a local port, records every request, and checks call
//! counts afterwards.
//!
//! ```rust,ignore
//! use fcoder_testing::{MockBackend, MockResponse};
//!
//! let backend = MockBackend::start().await?;
//! backend
//!     .expect_login()
//!     .respond_with(MockResponse::token("jwt"))
//!     .once();
//!
//! // point the client at backend.endpoint() ...
//!
//! backend.assert_verified();
//! ```

pub mod backend;
pub mod matcher;
pub mod response;

pub use backend::{
    BackendError, ExpectationBuilder, MockBackend, RecordedRequest, LOGIN_PATH, SIGNUP_PATH,
};
pub use matcher::RequestMatcher;
pub use response::{MockResponse, Times};
