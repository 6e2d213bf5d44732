use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result};
use tira_config::SearchProviderConfig;

const KEY_HEADER: &str = "api-key";
const VERSION_HEADER: &str = "x-pinecone-api-version";

/// One record returned by the vector-search service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
	#[serde(rename = "_id")]
	pub id: String,
	#[serde(rename = "_score", default)]
	pub score: f32,
	#[serde(default)]
	pub fields: Map<String, Value>,
}

/// Searches one namespace of the configured index with integrated embedding. The service embeds
/// `query` and returns up to `top_k` hits ordered by its own similarity score.
pub async fn search(
	cfg: &SearchProviderConfig,
	namespace: &str,
	query: &str,
	top_k: u32,
) -> Result<Vec<SearchHit>> {
	let host = cfg.index_host.as_deref().ok_or_else(|| Error::InvalidConfig {
		message: "Search index host is not resolved.".to_string(),
	})?;
	let url = records_search_url(host, namespace)?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let body = serde_json::json!({
		"query": {
			"inputs": { "text": query },
			"top_k": top_k,
		},
	});
	let res = client
		.post(url)
		.headers(crate::key_headers(KEY_HEADER, &cfg.api_key, &[(
			VERSION_HEADER,
			cfg.api_version.as_str(),
		)])?)
		.json(&body)
		.send()
		.await?;
	let json: Value = crate::error_for_status(res).await?.json().await?;

	parse_search_response(json)
}

/// Looks up the data-plane host of `cfg.index` through the control plane.
pub async fn resolve_index_host(cfg: &SearchProviderConfig) -> Result<String> {
	let mut url = Url::parse(&cfg.control_base).map_err(|err| Error::InvalidConfig {
		message: format!("Invalid search control_base {:?}: {err}.", cfg.control_base),
	})?;

	url.path_segments_mut()
		.map_err(|_| Error::InvalidConfig {
			message: "Search control_base cannot be a base URL.".to_string(),
		})?
		.pop_if_empty()
		.extend(["indexes", cfg.index.as_str()]);

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let res = client
		.get(url)
		.headers(crate::key_headers(KEY_HEADER, &cfg.api_key, &[(
			VERSION_HEADER,
			cfg.api_version.as_str(),
		)])?)
		.send()
		.await?;
	let json: Value = crate::error_for_status(res).await?.json().await?;
	let host = json.get("host").and_then(Value::as_str).ok_or_else(|| Error::InvalidResponse {
		message: "Index description is missing host.".to_string(),
	})?;

	tracing::debug!(index = %cfg.index, %host, "Resolved search index host.");

	Ok(host.to_string())
}

fn records_search_url(host: &str, namespace: &str) -> Result<Url> {
	let base = if host.contains("://") { host.to_string() } else { format!("https://{host}") };
	let mut url = Url::parse(&base).map_err(|err| Error::InvalidConfig {
		message: format!("Invalid search index host {host:?}: {err}."),
	})?;

	url.path_segments_mut()
		.map_err(|_| Error::InvalidConfig {
			message: format!("Search index host {host:?} cannot be a base URL."),
		})?
		.pop_if_empty()
		.extend(["records", "namespaces", namespace, "search"]);

	Ok(url)
}

fn parse_search_response(json: Value) -> Result<Vec<SearchHit>> {
	let hits = json
		.get("result")
		.and_then(|result| result.get("hits"))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Search response is missing result.hits.".to_string(),
		})?;

	Ok(serde_json::from_value(hits.clone())?)
}
