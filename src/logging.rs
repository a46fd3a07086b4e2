//! Test logging utilities
//!
//! The configurator logs which authentication mode it applied (and any
//! skipped malformed values) through the `log` facade; call
//! [`init_test_logging`] once per test binary to see that output under
//! `RUST_LOG`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests (call once)
///
/// Safe to call from every test; initialization happens only once per
/// process.
///
/// # Examples
///
/// ```
/// use grappelli::logging::init_test_logging;
///
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = env_logger::builder().is_test(true).try_init();
	});
}
