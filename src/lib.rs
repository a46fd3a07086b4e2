//! # Grappelli
//!
//! Authenticated API test clients for in-process application hosts.
//!
//! ## Overview
//!
//! Integration tests talk to an application booted in-process, with no real
//! network listener. This crate takes the host handle such a setup hands out
//! and returns ready-to-use HTTP clients whose requests already carry
//! authentication: either a pre-issued bearer token, or the test
//! authentication scheme plus synthetic identity headers (user id, email,
//! roles) that the application's test middleware resolves into a signed-in
//! user.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use grappelli::prelude::*;
//!
//! #[tokio::test]
//! async fn admin_can_list_users() {
//!     let host = boot_test_app().await; // your framework's TestHost impl
//!
//!     let client = host.client_with_auth(
//!         &TestCredentials::new()
//!             .with_user_id("u-42")
//!             .with_email("admin@example.com")
//!             .with_roles(["admin", "staff"]),
//!     );
//!
//!     let response = client.get("/api/users/").await.unwrap();
//!     response.assert_ok();
//! }
//! ```
//!
//! With a real token instead, identity headers are skipped entirely:
//!
//! ```rust,ignore
//! let client = host.bearer_client("eyJhbGciOi...");
//! ```
//!
//! ## Header contract
//!
//! The application under test's authentication middleware reads:
//!
//! | Header | Condition | Value |
//! |---|---|---|
//! | `Authorization` | token provided | `Bearer <token>` |
//! | `Authorization` | token absent | the `Test` scheme marker |
//! | `AuthorizationUserId` | user id set | raw user id |
//! | `AuthorizationEmail` | email set | raw email |
//! | `AuthorizationRoles` | roles set | comma-joined role names |
//!
//! The header-name constants are exported so both sides share one spelling.
//!
//! ## Modules
//!
//! - [`auth`]: credential inputs, header derivation, [`HostAuthExt`]
//! - [`client`]: [`TestClient`] for issuing requests
//! - [`host`]: the [`TestHost`] seam and [`InProcessHost`]
//! - [`response`]: [`TestResponse`] and assertion helpers
//! - [`fixtures`]: ready-made credentials for rstest
//! - [`logging`]: once-only test logging setup

pub mod auth;
pub mod client;
pub mod fixtures;
pub mod host;
pub mod logging;
pub mod response;

pub use auth::{
	HostAuthExt, TEST_AUTH_SCHEME, TEST_EMAIL_HEADER, TEST_ROLES_HEADER, TEST_SCHEME_VALUE,
	TEST_USER_ID_HEADER, TestCredentials, apply_auth_headers,
};
pub use client::{ClientError, ClientResult, TestClient, TestClientBuilder};
pub use fixtures::{admin_credentials, bearer_credentials, user_credentials};
pub use host::{InProcessHost, TestHost};
pub use logging::init_test_logging;
pub use response::{ResponseExt, TestResponse};

/// Re-export commonly used testing types
pub mod prelude {
	pub use super::auth::{HostAuthExt, TestCredentials, apply_auth_headers};
	pub use super::client::TestClient;
	pub use super::fixtures::{admin_credentials, bearer_credentials, user_credentials};
	pub use super::host::{InProcessHost, TestHost};
	pub use super::logging::init_test_logging;
	pub use super::response::{ResponseExt, TestResponse};
}
