//! Wire-level tests for the authentication header contract
//!
//! An in-process echo application serializes every request header back as
//! JSON, so these tests observe exactly what the application under test's
//! authentication middleware would receive.

use std::collections::BTreeMap;

use bytes::Bytes;
use grappelli::prelude::*;
use http::{Response, StatusCode};
use http_body_util::Full;
use rstest::rstest;

/// Application that echoes received headers as a JSON object.
fn echo_headers_host() -> InProcessHost {
	InProcessHost::new(|request| {
		let headers: BTreeMap<String, String> = request
			.headers()
			.iter()
			.map(|(name, value)| {
				(
					name.as_str().to_string(),
					String::from_utf8_lossy(value.as_bytes()).to_string(),
				)
			})
			.collect();
		let body = serde_json::to_vec(&headers).unwrap();
		Response::builder()
			.status(StatusCode::OK)
			.header("Content-Type", "application/json")
			.body(Full::new(Bytes::from(body)))
			.unwrap()
	})
}

/// Application that requires one specific bearer token.
fn token_guarded_host(expected: &'static str) -> InProcessHost {
	InProcessHost::new(move |request| {
		let authorized = request
			.headers()
			.get("authorization")
			.and_then(|value| value.to_str().ok())
			.is_some_and(|value| value == format!("Bearer {expected}"));
		let status = if authorized {
			StatusCode::OK
		} else {
			StatusCode::UNAUTHORIZED
		};
		Response::builder()
			.status(status)
			.body(Full::new(Bytes::new()))
			.unwrap()
	})
}

async fn received_headers(client: &TestClient) -> BTreeMap<String, String> {
	let response = client.get("/echo").await.unwrap();
	response.assert_ok();
	response.json().unwrap()
}

#[rstest]
#[tokio::test]
async fn bearer_client_sends_bearer_authorization_only() {
	init_test_logging();

	// Arrange
	let host = echo_headers_host();

	// Act
	let client = host.bearer_client("abc123");
	let headers = received_headers(&client).await;

	// Assert
	assert_eq!(headers["authorization"], "Bearer abc123");
	assert!(!headers.contains_key("authorizationuserid"));
	assert!(!headers.contains_key("authorizationemail"));
	assert!(!headers.contains_key("authorizationroles"));
}

#[rstest]
#[tokio::test]
async fn token_wins_over_identity_fields_on_the_wire() {
	init_test_logging();

	// Arrange
	let host = echo_headers_host();
	let credentials = TestCredentials::new()
		.with_user_id("u1")
		.with_email("a@b.com")
		.with_roles(["x", "y"])
		.with_token("abc123");

	// Act
	let client = host.client_with_auth(&credentials);
	let headers = received_headers(&client).await;

	// Assert
	assert_eq!(headers["authorization"], "Bearer abc123");
	assert!(!headers.contains_key("authorizationuserid"));
	assert!(!headers.contains_key("authorizationroles"));
}

#[rstest]
#[tokio::test]
async fn identity_client_sends_marker_and_identity_headers() {
	init_test_logging();

	// Arrange
	let host = echo_headers_host();
	let credentials = TestCredentials::new()
		.with_user_id("u1")
		.with_email("a@b.com")
		.with_roles(["x", "y"]);

	// Act
	let client = host.client_with_auth(&credentials);
	let headers = received_headers(&client).await;

	// Assert
	assert_eq!(headers["authorization"], "Test");
	assert_eq!(headers["authorizationuserid"], "u1");
	assert_eq!(headers["authorizationemail"], "a@b.com");
	assert_eq!(headers["authorizationroles"], "x,y");
}

#[rstest]
#[case(vec!["admin"], "admin")]
#[case(vec!["admin", "editor"], "admin,editor")]
#[tokio::test]
async fn roles_arrive_comma_joined(#[case] roles: Vec<&str>, #[case] expected: &str) {
	init_test_logging();

	// Arrange
	let host = echo_headers_host();

	// Act
	let client = host.client_with_auth(&TestCredentials::new().with_roles(roles));
	let headers = received_headers(&client).await;

	// Assert
	assert_eq!(headers["authorizationroles"], expected);
}

#[rstest]
#[tokio::test]
async fn empty_credentials_send_the_marker_alone() {
	init_test_logging();

	// Arrange
	let host = echo_headers_host();

	// Act
	let client = host.client_with_auth(&TestCredentials::new());
	let headers = received_headers(&client).await;

	// Assert
	assert_eq!(headers["authorization"], "Test");
	assert!(!headers.contains_key("authorizationuserid"));
	assert!(!headers.contains_key("authorizationemail"));
	assert!(!headers.contains_key("authorizationroles"));
}

#[rstest]
#[tokio::test]
async fn fixture_credentials_satisfy_the_contract(admin_credentials: TestCredentials) {
	init_test_logging();

	// Arrange
	let host = echo_headers_host();

	// Act
	let client = host.client_with_auth(&admin_credentials);
	let headers = received_headers(&client).await;

	// Assert
	assert_eq!(headers["authorization"], "Test");
	assert_eq!(headers["authorizationemail"], "admin@example.com");
	assert_eq!(headers["authorizationroles"], "admin,staff");
}

#[rstest]
#[tokio::test]
async fn guarded_application_accepts_the_issued_token() {
	init_test_logging();

	// Arrange
	let host = token_guarded_host("s3cret");

	// Act & Assert
	host.bearer_client("s3cret")
		.get("/private")
		.await
		.unwrap()
		.assert_ok();
	host.bearer_client("wrong")
		.get("/private")
		.await
		.unwrap()
		.assert_unauthorized();
	host.client_with_auth(&TestCredentials::new().with_user_id("u1"))
		.get("/private")
		.await
		.unwrap()
		.assert_unauthorized();
}

#[rstest]
#[tokio::test]
async fn parallel_clients_do_not_share_configuration() {
	init_test_logging();

	// Arrange
	let host = echo_headers_host();
	let bearer = host.bearer_client("abc123");
	let identity = host.client_with_auth(&TestCredentials::new().with_user_id("u1"));

	// Act
	let (bearer_headers, identity_headers) =
		tokio::join!(received_headers(&bearer), received_headers(&identity));

	// Assert
	assert_eq!(bearer_headers["authorization"], "Bearer abc123");
	assert_eq!(identity_headers["authorization"], "Test");
	assert_eq!(identity_headers["authorizationuserid"], "u1");
}
