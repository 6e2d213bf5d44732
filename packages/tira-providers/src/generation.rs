use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::{Error, Result};
use tira_config::GenerationProviderConfig;

const KEY_HEADER: &str = "x-goog-api-key";

/// Sends `prompt` to the generative model using one credential from the pool.
pub async fn generate(
	cfg: &GenerationProviderConfig,
	api_key: &str,
	prompt: &str,
) -> Result<String> {
	let url = generate_content_url(&cfg.api_base, &cfg.model)?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let body = serde_json::json!({
		"contents": [
			{ "role": "user", "parts": [{ "text": prompt }] }
		],
		"generationConfig": { "temperature": cfg.temperature },
	});
	let res = client
		.post(url)
		.headers(crate::key_headers(KEY_HEADER, api_key, &[])?)
		.json(&body)
		.send()
		.await?;
	let json: Value = crate::error_for_status(res).await?.json().await?;

	parse_generation_response(json)
}

fn generate_content_url(api_base: &str, model: &str) -> Result<Url> {
	let mut url = Url::parse(api_base).map_err(|err| Error::InvalidConfig {
		message: format!("Invalid generation api_base {api_base:?}: {err}."),
	})?;
	let method = format!("{model}:generateContent");

	url.path_segments_mut()
		.map_err(|_| Error::InvalidConfig {
			message: format!("Generation api_base {api_base:?} cannot be a base URL."),
		})?
		.pop_if_empty()
		.extend(["v1beta", "models", method.as_str()]);

	Ok(url)
}

fn parse_generation_response(json: Value) -> Result<String> {
	if let Some(reason) = json
		.get("promptFeedback")
		.and_then(|feedback| feedback.get("blockReason"))
		.and_then(Value::as_str)
	{
		return Err(Error::InvalidResponse { message: format!("Prompt was blocked: {reason}.") });
	}

	let parts = json
		.get("candidates")
		.and_then(Value::as_array)
		.and_then(|candidates| candidates.first())
		.and_then(|candidate| candidate.get("content"))
		.and_then(|content| content.get("parts"))
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Generation response is missing candidate content.".to_string(),
		})?;
	let text: String =
		parts.iter().filter_map(|part| part.get("text").and_then(Value::as_str)).collect();

	if text.trim().is_empty() {
		return Err(Error::InvalidResponse {
			message: "Generation response contains no text.".to_string(),
		});
	}

	Ok(text)
}
