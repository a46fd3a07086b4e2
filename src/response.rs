//! Test response wrapper with assertion helpers

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Response returned by [`TestClient`](crate::client::TestClient) requests
pub struct TestResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Bytes,
}

impl TestResponse {
	/// Collect a full `http` response into a test response
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::TestResponse;
	/// use http::{Response, StatusCode};
	/// use http_body_util::Full;
	/// use bytes::Bytes;
	///
	/// # tokio_test::block_on(async {
	/// let response = Response::builder()
	///     .status(StatusCode::OK)
	///     .body(Full::new(Bytes::from("Hello")))
	///     .unwrap();
	/// let response = TestResponse::new(response).await;
	/// assert_eq!(response.status(), StatusCode::OK);
	/// # });
	/// ```
	pub async fn new(response: Response<Full<Bytes>>) -> Self {
		let (parts, body) = response.into_parts();
		let body_bytes = body
			.collect()
			.await
			.map(|collected| collected.to_bytes())
			.unwrap_or_else(|_| Bytes::new());

		Self {
			status: parts.status,
			headers: parts.headers,
			body: body_bytes,
		}
	}

	/// Create a test response from already-collected parts
	pub fn with_body(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			status,
			headers,
			body,
		}
	}

	/// Get response status
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Get response headers
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Get response body as bytes
	pub fn body(&self) -> &Bytes {
		&self.body
	}

	/// Get response body as string
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).to_string()
	}

	/// Parse response body as JSON
	pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}

	/// Parse response body as generic JSON value
	pub fn json_value(&self) -> Result<Value, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}

	/// Check if response is successful (2xx)
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Check if response is client error (4xx)
	pub fn is_client_error(&self) -> bool {
		self.status.is_client_error()
	}

	/// Get header value
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}
}

/// Extension trait for response assertions
pub trait ResponseExt {
	/// Assert status code
	fn assert_status(&self, expected: StatusCode) -> &Self;

	/// Assert 2xx success
	fn assert_success(&self) -> &Self;

	fn assert_ok(&self) -> &Self;
	fn assert_bad_request(&self) -> &Self;
	fn assert_unauthorized(&self) -> &Self;
	fn assert_forbidden(&self) -> &Self;
	fn assert_not_found(&self) -> &Self;
}

impl ResponseExt for TestResponse {
	fn assert_status(&self, expected: StatusCode) -> &Self {
		assert_eq!(
			self.status,
			expected,
			"Expected status {}, got {}. Body: {}",
			expected,
			self.status,
			self.text()
		);
		self
	}

	fn assert_success(&self) -> &Self {
		assert!(
			self.is_success(),
			"Expected success status (2xx), got {}. Body: {}",
			self.status,
			self.text()
		);
		self
	}

	fn assert_ok(&self) -> &Self {
		self.assert_status(StatusCode::OK)
	}

	fn assert_bad_request(&self) -> &Self {
		self.assert_status(StatusCode::BAD_REQUEST)
	}

	fn assert_unauthorized(&self) -> &Self {
		self.assert_status(StatusCode::UNAUTHORIZED)
	}

	fn assert_forbidden(&self) -> &Self {
		self.assert_status(StatusCode::FORBIDDEN)
	}

	fn assert_not_found(&self) -> &Self {
		self.assert_status(StatusCode::NOT_FOUND)
	}
}
