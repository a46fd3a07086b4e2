//! Authentication header configuration for test clients
//!
//! Derives and attaches authentication-related headers to a freshly created
//! test client: either a real `Bearer` token, or the test scheme marker plus
//! synthetic identity headers that test-environment middleware resolves into
//! a signed-in user.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue};
use log::{debug, warn};
use once_cell::sync::Lazy;

use crate::client::TestClient;
use crate::host::TestHost;

/// Scheme name carried in `Authorization` when no bearer token is supplied.
///
/// The application under test registers its test authentication handler under
/// this scheme; the bare scheme (no credential payload) tells that handler to
/// read identity from the companion headers instead.
pub const TEST_AUTH_SCHEME: &str = "Test";

/// Shared `Authorization` value for the test scheme.
///
/// Initialized once and reused across all identity-mode configurations; the
/// value is immutable, so concurrent test runners can read it without
/// synchronization.
pub static TEST_SCHEME_VALUE: Lazy<HeaderValue> =
	Lazy::new(|| HeaderValue::from_static(TEST_AUTH_SCHEME));

/// Header carrying the synthetic user identifier.
pub static TEST_USER_ID_HEADER: Lazy<HeaderName> =
	Lazy::new(|| HeaderName::from_static("authorizationuserid"));

/// Header carrying the synthetic email address.
pub static TEST_EMAIL_HEADER: Lazy<HeaderName> =
	Lazy::new(|| HeaderName::from_static("authorizationemail"));

/// Header carrying the comma-joined role names.
pub static TEST_ROLES_HEADER: Lazy<HeaderName> =
	Lazy::new(|| HeaderName::from_static("authorizationroles"));

/// Credential inputs for configuring a test client.
///
/// All fields are optional; empty strings and empty role lists mean "omit".
/// A non-empty `token` takes absolute precedence: the client is configured
/// with `Bearer <token>` and every identity field is ignored.
///
/// # Examples
///
/// ```
/// use grappelli::TestCredentials;
///
/// let admin = TestCredentials::new()
///     .with_user_id("u-42")
///     .with_email("admin@example.com")
///     .with_roles(["admin", "staff"]);
///
/// let pre_issued = TestCredentials::bearer("abc123");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestCredentials {
	/// Synthetic user identifier; empty means omit.
	pub user_id: Option<String>,
	/// Synthetic email address; empty means omit.
	pub email: Option<String>,
	/// Pre-issued bearer token; non-empty wins over all identity fields.
	pub token: Option<String>,
	/// Ordered role names; empty means omit.
	pub roles: Vec<String>,
}

impl TestCredentials {
	/// Create empty credentials (marker-only `Authorization`)
	pub fn new() -> Self {
		Self::default()
	}

	/// Create credentials from a pre-issued bearer token
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::TestCredentials;
	///
	/// let credentials = TestCredentials::bearer("abc123");
	/// assert_eq!(credentials.token.as_deref(), Some("abc123"));
	/// ```
	pub fn bearer(token: impl Into<String>) -> Self {
		Self {
			token: Some(token.into()),
			..Self::default()
		}
	}

	/// Set the synthetic user identifier
	pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
		self.user_id = Some(user_id.into());
		self
	}

	/// Set the synthetic email address
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}

	/// Set the bearer token
	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into());
		self
	}

	/// Append a single role name
	pub fn with_role(mut self, role: impl Into<String>) -> Self {
		self.roles.push(role.into());
		self
	}

	/// Replace the role list
	pub fn with_roles<I>(mut self, roles: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.roles = roles.into_iter().map(Into::into).collect();
		self
	}
}

/// The "has content" predicate applied uniformly before each attachment.
fn has_content(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|value| !value.is_empty())
}

/// Insert a header, or skip it when the value is not a legal HTTP header
/// value. Attachment never fails; malformed values degrade to "omitted".
fn insert_checked(headers: &mut HeaderMap, name: &HeaderName, value: &str) {
	match HeaderValue::from_str(value) {
		Ok(value) => {
			headers.insert(name, value);
		}
		Err(_) => {
			warn!("skipping {name}: value is not a valid HTTP header value");
		}
	}
}

/// Derive authentication headers from `credentials` and attach them to
/// `headers`.
///
/// With a non-empty token, `Authorization` is set to `Bearer <token>` and
/// every identity field is ignored. Otherwise `Authorization` carries the
/// [`TEST_AUTH_SCHEME`] marker, followed by the user-id, email, and
/// comma-joined roles headers for whichever identity fields have content.
///
/// Values are attached without format validation; at most four headers are
/// touched, and nothing else is mutated.
///
/// # Examples
///
/// ```
/// use grappelli::{TestCredentials, apply_auth_headers};
/// use http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// let credentials = TestCredentials::new()
///     .with_user_id("u1")
///     .with_roles(["x", "y"]);
/// apply_auth_headers(&mut headers, &credentials);
///
/// assert_eq!(headers["authorization"], "Test");
/// assert_eq!(headers["authorizationuserid"], "u1");
/// assert_eq!(headers["authorizationroles"], "x,y");
/// ```
pub fn apply_auth_headers(headers: &mut HeaderMap, credentials: &TestCredentials) {
	if let Some(token) = has_content(&credentials.token) {
		debug!("configuring client with bearer authorization");
		insert_checked(headers, &AUTHORIZATION, &format!("Bearer {token}"));
		return;
	}

	debug!("configuring client with test-scheme identity headers");
	headers.insert(AUTHORIZATION, TEST_SCHEME_VALUE.clone());

	if let Some(user_id) = has_content(&credentials.user_id) {
		insert_checked(headers, &TEST_USER_ID_HEADER, user_id);
	}
	if let Some(email) = has_content(&credentials.email) {
		insert_checked(headers, &TEST_EMAIL_HEADER, email);
	}
	if !credentials.roles.is_empty() {
		insert_checked(headers, &TEST_ROLES_HEADER, &credentials.roles.join(","));
	}
}

/// Authentication extensions for [`TestHost`]
///
/// Blanket-implemented for every host handle, so any test-hosting framework
/// that can hand out clients gets authenticated variants for free.
///
/// # Examples
///
/// ```rust,ignore
/// use grappelli::prelude::*;
///
/// let host = my_framework_host();
/// let client = host.client_with_auth(
///     &TestCredentials::new().with_user_id("u1").with_role("admin"),
/// );
/// let response = client.get("/api/projects/").await?;
/// response.assert_ok();
/// ```
pub trait HostAuthExt: TestHost {
	/// Create a client carrying authentication headers derived from
	/// `credentials`. The client is mutated once and owned by the caller
	/// thereafter.
	fn client_with_auth(&self, credentials: &TestCredentials) -> TestClient {
		let mut client = self.client();
		apply_auth_headers(client.headers_mut(), credentials);
		client
	}

	/// Create a client authenticated with a pre-issued bearer token
	fn bearer_client(&self, token: &str) -> TestClient {
		self.client_with_auth(&TestCredentials::bearer(token))
	}
}

impl<H: TestHost + ?Sized> HostAuthExt for H {}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn configured(credentials: &TestCredentials) -> HeaderMap {
		let mut headers = HeaderMap::new();
		apply_auth_headers(&mut headers, credentials);
		headers
	}

	#[rstest]
	fn bearer_token_sets_bearer_authorization() {
		// Arrange
		let credentials = TestCredentials::bearer("abc123");

		// Act
		let headers = configured(&credentials);

		// Assert
		assert_eq!(headers["authorization"], "Bearer abc123");
		assert_eq!(headers.len(), 1);
	}

	#[rstest]
	fn bearer_token_wins_over_identity_fields() {
		// Arrange
		let credentials = TestCredentials::new()
			.with_user_id("u1")
			.with_email("a@b.com")
			.with_roles(["x", "y"])
			.with_token("abc123");

		// Act
		let headers = configured(&credentials);

		// Assert
		assert_eq!(headers["authorization"], "Bearer abc123");
		assert!(!headers.contains_key(&*TEST_USER_ID_HEADER));
		assert!(!headers.contains_key(&*TEST_EMAIL_HEADER));
		assert!(!headers.contains_key(&*TEST_ROLES_HEADER));
	}

	#[rstest]
	fn missing_token_sets_the_shared_marker() {
		// Arrange
		let first = configured(&TestCredentials::new());

		// Act
		let second = configured(&TestCredentials::new().with_user_id("u1"));

		// Assert
		assert_eq!(first["authorization"], TEST_AUTH_SCHEME);
		assert_eq!(first["authorization"], second["authorization"]);
	}

	#[rstest]
	#[case(TestCredentials::new())]
	#[case(TestCredentials::new().with_user_id(""))]
	#[case(TestCredentials::new().with_token(""))]
	fn empty_inputs_omit_identity_headers(#[case] credentials: TestCredentials) {
		// Act
		let headers = configured(&credentials);

		// Assert
		assert_eq!(headers["authorization"], TEST_AUTH_SCHEME);
		assert_eq!(headers.len(), 1);
	}

	#[rstest]
	fn non_empty_user_id_is_attached_verbatim() {
		// Arrange
		let credentials = TestCredentials::new().with_user_id("u1");

		// Act
		let headers = configured(&credentials);

		// Assert
		assert_eq!(headers[&*TEST_USER_ID_HEADER], "u1");
	}

	#[rstest]
	#[case(vec!["admin"], "admin")]
	#[case(vec!["admin", "editor"], "admin,editor")]
	#[case(vec!["x", "y", "z"], "x,y,z")]
	fn roles_are_joined_with_commas(#[case] roles: Vec<&str>, #[case] expected: &str) {
		// Arrange
		let credentials = TestCredentials::new().with_roles(roles);

		// Act
		let headers = configured(&credentials);

		// Assert
		assert_eq!(headers[&*TEST_ROLES_HEADER], expected);
	}

	#[rstest]
	fn empty_role_list_omits_the_roles_header() {
		// Arrange
		let credentials = TestCredentials::new().with_user_id("u1");

		// Act
		let headers = configured(&credentials);

		// Assert
		assert!(!headers.contains_key(&*TEST_ROLES_HEADER));
	}

	#[rstest]
	fn full_identity_scenario_attaches_all_four_headers() {
		// Arrange
		let credentials = TestCredentials::new()
			.with_user_id("u1")
			.with_email("a@b.com")
			.with_roles(["x", "y"]);

		// Act
		let headers = configured(&credentials);

		// Assert
		assert_eq!(headers["authorization"], TEST_AUTH_SCHEME);
		assert_eq!(headers[&*TEST_USER_ID_HEADER], "u1");
		assert_eq!(headers[&*TEST_EMAIL_HEADER], "a@b.com");
		assert_eq!(headers[&*TEST_ROLES_HEADER], "x,y");
		assert_eq!(headers.len(), 4);
	}

	#[rstest]
	fn malformed_value_is_omitted_without_failing() {
		// Arrange
		let credentials = TestCredentials::new()
			.with_user_id("u1")
			.with_email("evil\r\nInjected-Header: x");

		// Act
		let headers = configured(&credentials);

		// Assert
		assert_eq!(headers[&*TEST_USER_ID_HEADER], "u1");
		assert!(!headers.contains_key(&*TEST_EMAIL_HEADER));
	}
}
