//! In-process host handles
//!
//! A host handle boots nothing and owns nothing network-visible: it is the
//! seam through which the surrounding test-hosting framework hands out
//! clients bound to the application under test. [`InProcessHost`] is the
//! bundled implementation, wiring clients straight to a request handler
//! function with no listener in between.

use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;

use crate::client::{RequestHandler, TestClient};

/// Handle to an in-process application under test
///
/// Implementations create a fresh client per call, each bound to the same
/// application instance. Host lifecycle (startup, teardown) belongs to the
/// implementor, not to this crate.
///
/// # Examples
///
/// ```
/// use grappelli::{InProcessHost, TestHost};
/// use http::{Response, StatusCode};
/// use http_body_util::Full;
/// use bytes::Bytes;
///
/// let host = InProcessHost::new(|_req| {
///     Response::builder()
///         .status(StatusCode::OK)
///         .body(Full::new(Bytes::from("ok")))
///         .unwrap()
/// });
/// let client = host.client();
/// ```
pub trait TestHost {
	/// Create a new client bound to this application instance
	fn client(&self) -> TestClient;
}

/// Host handle dispatching requests directly to a handler function
///
/// Requests issued by the clients it hands out never touch a socket; the
/// handler receives the fully built request, default headers included.
#[derive(Clone)]
pub struct InProcessHost {
	handler: RequestHandler,
}

impl InProcessHost {
	/// Wrap a handler function as an in-process application
	pub fn new<F>(handler: F) -> Self
	where
		F: Fn(Request<Full<Bytes>>) -> Response<Full<Bytes>> + Send + Sync + 'static,
	{
		Self {
			handler: Arc::new(handler),
		}
	}
}

impl TestHost for InProcessHost {
	fn client(&self) -> TestClient {
		TestClient::with_handler(Arc::clone(&self.handler))
	}
}
