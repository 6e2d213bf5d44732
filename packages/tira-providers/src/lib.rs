pub mod generation;
pub mod search;

mod error;

pub use error::{Error, Result};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Builds request headers carrying `api_key` under `key_header`, plus any fixed extras.
///
/// The key value is marked sensitive so it never shows up in debug output.
pub fn key_headers(
	key_header: &'static str,
	api_key: &str,
	extra: &[(&'static str, &str)],
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	let mut value = HeaderValue::from_str(api_key)?;

	value.set_sensitive(true);
	headers.insert(HeaderName::from_static(key_header), value);

	for (name, raw) in extra {
		headers.insert(HeaderName::from_static(name), HeaderValue::from_str(raw)?);
	}

	Ok(headers)
}

pub(crate) async fn error_for_status(res: reqwest::Response) -> Result<reqwest::Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let body = res.text().await.unwrap_or_default();

	Err(Error::Status { status: status.as_u16(), body })
}
