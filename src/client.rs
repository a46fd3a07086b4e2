//! HTTP client for integration tests
//!
//! A slim client bound to an application under test, either through an
//! in-process handler function (no network listener) or over real transport
//! via `reqwest`. Default headers are mutated synchronously while the
//! configurator still owns the client; request methods are async.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response};
use http_body_util::{BodyExt, Full};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::response::TestResponse;

/// Handler function an in-process client dispatches requests to
pub type RequestHandler = Arc<dyn Fn(Request<Full<Bytes>>) -> Response<Full<Bytes>> + Send + Sync>;

#[derive(Debug, Error)]
pub enum ClientError {
	#[error("HTTP error: {0}")]
	Http(#[from] http::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Invalid header value: {0}")]
	InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

	#[error("Reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),

	#[error("Request failed: {0}")]
	RequestFailed(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Builder for creating a [`TestClient`] with custom configuration
///
/// # Examples
///
/// ```
/// use grappelli::TestClient;
/// use std::time::Duration;
///
/// let client = TestClient::builder()
///     .base_url("http://localhost:8080")
///     .timeout(Duration::from_secs(30))
///     .build();
/// ```
pub struct TestClientBuilder {
	base_url: String,
	timeout: Option<Duration>,
	handler: Option<RequestHandler>,
}

impl TestClientBuilder {
	/// Create a new builder with default configuration
	pub fn new() -> Self {
		Self {
			base_url: "http://testserver".to_string(),
			timeout: None,
			handler: None,
		}
	}

	/// Set the base URL for requests over real transport
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();
		self
	}

	/// Set the request timeout
	pub fn timeout(mut self, duration: Duration) -> Self {
		self.timeout = Some(duration);
		self
	}

	/// Dispatch requests to an in-process handler instead of real transport
	pub fn handler<F>(mut self, handler: F) -> Self
	where
		F: Fn(Request<Full<Bytes>>) -> Response<Full<Bytes>> + Send + Sync + 'static,
	{
		self.handler = Some(Arc::new(handler));
		self
	}

	/// Build the [`TestClient`]
	pub fn build(self) -> TestClient {
		let mut client_builder = reqwest::Client::builder();
		if let Some(timeout) = self.timeout {
			client_builder = client_builder.timeout(timeout);
		}
		let http_client = client_builder
			.build()
			.expect("Failed to build reqwest client");

		TestClient {
			base_url: self.base_url,
			default_headers: HeaderMap::new(),
			handler: self.handler,
			http_client,
		}
	}
}

impl Default for TestClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Test client bound to an application under test
///
/// # Examples
///
/// ```rust,no_run
/// use grappelli::TestClient;
/// use http::StatusCode;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TestClient::with_base_url("http://localhost:8080");
/// let payload = json!({"name": "fixture"});
/// client.post("/api/projects/", &payload, "json").await?;
/// let response = client.get("/api/projects/").await?;
/// assert_eq!(response.status(), StatusCode::OK);
/// # Ok(())
/// # }
/// ```
pub struct TestClient {
	/// Base URL for requests over real transport
	base_url: String,

	/// Default headers included in every request
	default_headers: HeaderMap,

	/// In-process handler; when set, requests never touch a socket
	handler: Option<RequestHandler>,

	/// Reusable HTTP client for the real-transport path
	http_client: reqwest::Client,
}

impl TestClient {
	/// Create a new client with default configuration
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::TestClient;
	///
	/// let client = TestClient::new();
	/// assert_eq!(client.base_url(), "http://testserver");
	/// ```
	pub fn new() -> Self {
		TestClientBuilder::new().build()
	}

	/// Create a client with a custom base URL
	pub fn with_base_url(base_url: impl Into<String>) -> Self {
		TestClientBuilder::new().base_url(base_url).build()
	}

	/// Create a client dispatching to an in-process handler
	pub fn with_handler(handler: RequestHandler) -> Self {
		let mut builder = TestClientBuilder::new();
		builder.handler = Some(handler);
		builder.build()
	}

	/// Create a builder for customizing the client configuration
	pub fn builder() -> TestClientBuilder {
		TestClientBuilder::new()
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Default headers included in every request
	pub fn headers(&self) -> &HeaderMap {
		&self.default_headers
	}

	/// Mutable access to the default headers
	pub fn headers_mut(&mut self) -> &mut HeaderMap {
		&mut self.default_headers
	}

	/// Set a default header for all requests
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::TestClient;
	///
	/// let mut client = TestClient::new();
	/// client.set_header("User-Agent", "grappelli/1.0").unwrap();
	/// ```
	pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> ClientResult<()> {
		let header_name: HeaderName = name.as_ref().parse().map_err(|_| {
			ClientError::RequestFailed(format!("Invalid header name: {}", name.as_ref()))
		})?;
		self.default_headers
			.insert(header_name, HeaderValue::from_str(value.as_ref())?);
		Ok(())
	}

	/// Set credentials for Basic authentication
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::TestClient;
	///
	/// let mut client = TestClient::new();
	/// client.basic_credentials("username", "password").unwrap();
	/// ```
	pub fn basic_credentials(&mut self, username: &str, password: &str) -> ClientResult<()> {
		let encoded = base64::encode(format!("{username}:{password}"));
		self.set_header("Authorization", format!("Basic {encoded}"))
	}

	/// Make a GET request
	pub async fn get(&self, path: &str) -> ClientResult<TestResponse> {
		self.request(Method::GET, path, None, None).await
	}

	/// Make a POST request with a serialized body
	///
	/// `format` selects the body encoding: `"json"` or `"form"`.
	pub async fn post<T: Serialize>(
		&self,
		path: &str,
		data: &T,
		format: &str,
	) -> ClientResult<TestResponse> {
		let body = self.serialize_data(data, format)?;
		let content_type = self.get_content_type(format);
		self.request(Method::POST, path, Some(body), Some(content_type))
			.await
	}

	/// Make a PUT request with a serialized body
	pub async fn put<T: Serialize>(
		&self,
		path: &str,
		data: &T,
		format: &str,
	) -> ClientResult<TestResponse> {
		let body = self.serialize_data(data, format)?;
		let content_type = self.get_content_type(format);
		self.request(Method::PUT, path, Some(body), Some(content_type))
			.await
	}

	/// Make a PATCH request with a serialized body
	pub async fn patch<T: Serialize>(
		&self,
		path: &str,
		data: &T,
		format: &str,
	) -> ClientResult<TestResponse> {
		let body = self.serialize_data(data, format)?;
		let content_type = self.get_content_type(format);
		self.request(Method::PATCH, path, Some(body), Some(content_type))
			.await
	}

	/// Make a DELETE request
	pub async fn delete(&self, path: &str) -> ClientResult<TestResponse> {
		self.request(Method::DELETE, path, None, None).await
	}

	/// Make a HEAD request
	pub async fn head(&self, path: &str) -> ClientResult<TestResponse> {
		self.request(Method::HEAD, path, None, None).await
	}

	/// Make a GET request with additional per-request headers
	pub async fn get_with_headers(
		&self,
		path: &str,
		headers: &[(&str, &str)],
	) -> ClientResult<TestResponse> {
		self.request_with_extra_headers(Method::GET, path, None, None, headers)
			.await
	}

	/// Make a POST request with a raw body, bypassing serialization
	pub async fn post_raw(
		&self,
		path: &str,
		body: &[u8],
		content_type: &str,
	) -> ClientResult<TestResponse> {
		self.request(
			Method::POST,
			path,
			Some(Bytes::copy_from_slice(body)),
			Some(content_type),
		)
		.await
	}

	async fn request(
		&self,
		method: Method,
		path: &str,
		body: Option<Bytes>,
		content_type: Option<&str>,
	) -> ClientResult<TestResponse> {
		self.request_with_extra_headers(method, path, body, content_type, &[])
			.await
	}

	/// Generic request method; extra headers apply to this request only and
	/// override same-named default headers.
	async fn request_with_extra_headers(
		&self,
		method: Method,
		path: &str,
		body: Option<Bytes>,
		content_type: Option<&str>,
		extra_headers: &[(&str, &str)],
	) -> ClientResult<TestResponse> {
		let url = if path.starts_with("http://") || path.starts_with("https://") {
			path.to_string()
		} else {
			format!("{}{}", self.base_url, path)
		};

		let mut req_builder = Request::builder().method(method).uri(url);

		for (name, value) in self.default_headers.iter() {
			req_builder = req_builder.header(name, value);
		}
		for (name, value) in extra_headers {
			req_builder = req_builder.header(*name, *value);
		}
		if let Some(ct) = content_type {
			req_builder = req_builder.header("Content-Type", ct);
		}

		let request = req_builder.body(Full::new(body.unwrap_or_default()))?;

		if let Some(handler) = &self.handler {
			let response = handler(request);
			return Ok(TestResponse::new(response).await);
		}

		self.send_over_transport(request).await
	}

	/// Real-transport path: convert the built request to reqwest and back
	async fn send_over_transport(&self, request: Request<Full<Bytes>>) -> ClientResult<TestResponse> {
		let (parts, body) = request.into_parts();

		let url = if parts.uri.scheme_str().is_some() {
			parts.uri.to_string()
		} else {
			format!("{}{}", self.base_url.trim_end_matches('/'), parts.uri.path())
		};

		let mut reqwest_request = self
			.http_client
			.request(parts.method, &url)
			.headers(parts.headers);

		let body_bytes = body
			.collect()
			.await
			.map(|collected| collected.to_bytes())
			.unwrap_or_else(|_| Bytes::new());
		if !body_bytes.is_empty() {
			reqwest_request = reqwest_request.body(body_bytes.to_vec());
		}

		let reqwest_response = reqwest_request.send().await?;

		let status = reqwest_response.status();
		let headers = reqwest_response.headers().clone();
		let body_bytes = reqwest_response.bytes().await?;

		Ok(TestResponse::with_body(status, headers, body_bytes))
	}

	/// Serialize data based on format
	fn serialize_data<T: Serialize>(&self, data: &T, format: &str) -> ClientResult<Bytes> {
		match format {
			"json" => {
				let json = serde_json::to_vec(data)?;
				Ok(Bytes::from(json))
			}
			"form" => {
				let json_value = serde_json::to_value(data)?;
				if let Value::Object(map) = json_value {
					let form_data = map
						.iter()
						.map(|(k, v)| {
							let value_str = match v {
								Value::String(s) => s.clone(),
								_ => v.to_string(),
							};
							format!("{}={}", urlencoding::encode(k), urlencoding::encode(&value_str))
						})
						.collect::<Vec<_>>()
						.join("&");
					Ok(Bytes::from(form_data))
				} else {
					Err(ClientError::RequestFailed(
						"Expected object for form data".to_string(),
					))
				}
			}
			_ => Err(ClientError::RequestFailed(format!(
				"Unsupported format: {format}"
			))),
		}
	}

	/// Get content type for format
	fn get_content_type(&self, format: &str) -> &str {
		match format {
			"json" => "application/json",
			"form" => "application/x-www-form-urlencoded",
			_ => "application/octet-stream",
		}
	}
}

impl Default for TestClient {
	fn default() -> Self {
		Self::new()
	}
}

mod base64 {
	pub(super) fn encode(input: String) -> String {
		use base64_simd::STANDARD;
		STANDARD.encode_to_string(input.as_bytes())
	}
}

mod urlencoding {
	pub(super) fn encode(input: &str) -> String {
		url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
	}
}
