mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, GenerationProviderConfig, Partition, Providers, Report, Search, SearchProviderConfig,
	Service, default_partitions,
};

use std::{collections::HashSet, env, fs, path::Path};

pub const ENV_SEARCH_API_KEY: &str = "PINECONE_API_KEY";
pub const ENV_SEARCH_INDEX: &str = "PINECONE_INDEX";
pub const ENV_SEARCH_INDEX_HOST: &str = "PINECONE_INDEX_HOST";
pub const ENV_GENERATION_API_KEYS: &str = "GEMINI_API_KEYS";
pub const ENV_GENERATION_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_PORT: &str = "PORT";

/// Loads the config file (or defaults when no path is given), overlays the process environment,
/// then normalizes and validates the result.
pub fn load(path: Option<&Path>) -> Result<Config> {
	load_with_env(path, |key| env::var(key).ok())
}

pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let mut cfg = match path {
		Some(path) => {
			let raw = fs::read_to_string(path)
				.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

			toml::from_str(&raw)
				.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?
		},
		None => Config::default(),
	};

	apply_env(&mut cfg, lookup)?;
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn apply_env<F>(cfg: &mut Config, lookup: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(key) = lookup(ENV_SEARCH_API_KEY) {
		cfg.providers.search.api_key = key;
	}
	if let Some(index) = lookup(ENV_SEARCH_INDEX) {
		cfg.providers.search.index = index;
	}
	if let Some(host) = lookup(ENV_SEARCH_INDEX_HOST) {
		cfg.providers.search.index_host = Some(host);
	}

	let pool = lookup(ENV_GENERATION_API_KEYS)
		.map(|keys| split_credentials(&keys))
		.filter(|keys| !keys.is_empty());

	if let Some(keys) = pool {
		cfg.providers.generation.api_keys = keys;
	} else if let Some(key) = lookup(ENV_GENERATION_API_KEY).filter(|key| !key.trim().is_empty()) {
		cfg.providers.generation.api_keys = vec![key];
	}

	if let Some(port) = lookup(ENV_PORT) {
		cfg.service.port = port.trim().parse().map_err(|_| Error::Validation {
			message: format!("{ENV_PORT} must be a valid port number, got {port:?}."),
		})?;
	}

	Ok(())
}

pub fn split_credentials(raw: &str) -> Vec<String> {
	raw.split(',').map(str::trim).filter(|key| !key.is_empty()).map(str::to_string).collect()
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.providers.generation.api_keys.is_empty() {
		return Err(Error::Validation {
			message: format!(
				"providers.generation.api_keys must be non-empty; set {ENV_GENERATION_API_KEYS}."
			),
		});
	}
	if cfg.providers.generation.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.generation.model must be non-empty.".to_string(),
		});
	}
	if !cfg.providers.generation.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.generation.temperature must be a finite number.".to_string(),
		});
	}
	if cfg.providers.search.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: format!(
				"providers.search.api_key must be non-empty; set {ENV_SEARCH_API_KEY}."
			),
		});
	}
	if cfg.providers.search.index.trim().is_empty() && cfg.providers.search.index_host.is_none() {
		return Err(Error::Validation {
			message: format!("providers.search.index must be non-empty; set {ENV_SEARCH_INDEX}."),
		});
	}

	for (label, timeout_ms) in [
		("providers.search.timeout_ms", cfg.providers.search.timeout_ms),
		("providers.generation.timeout_ms", cfg.providers.generation.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.search.top_k == 0 {
		return Err(Error::Validation {
			message: "search.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.report.default_result_count == 0 {
		return Err(Error::Validation {
			message: "report.default_result_count must be greater than zero.".to_string(),
		});
	}
	if cfg.report.refusal_max_chars == 0 {
		return Err(Error::Validation {
			message: "report.refusal_max_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.partitions.is_empty() {
		return Err(Error::Validation { message: "partitions must be non-empty.".to_string() });
	}

	let mut seen = HashSet::new();

	for partition in &cfg.partitions {
		if partition.name.trim().is_empty() {
			return Err(Error::Validation {
				message: "partitions.name must be non-empty.".to_string(),
			});
		}
		if !seen.insert(partition.name.as_str()) {
			return Err(Error::Validation {
				message: format!("Partition {} is declared more than once.", partition.name),
			});
		}
		if partition.keywords.is_empty() {
			return Err(Error::Validation {
				message: format!("Partition {} must declare at least one keyword.", partition.name),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.providers.generation.api_keys = cfg
		.providers
		.generation
		.api_keys
		.iter()
		.map(|key| key.trim())
		.filter(|key| !key.is_empty())
		.map(str::to_string)
		.collect();

	if cfg
		.providers
		.search
		.index_host
		.as_deref()
		.map(|host| host.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.search.index_host = None;
	}

	for partition in &mut cfg.partitions {
		partition.name = partition.name.trim().to_string();
		partition.keywords = partition
			.keywords
			.iter()
			.map(|keyword| keyword.trim().to_lowercase())
			.filter(|keyword| !keyword.is_empty())
			.collect();
	}

	cfg.report.refusal_phrases = cfg
		.report
		.refusal_phrases
		.iter()
		.map(|phrase| phrase.trim().to_lowercase())
		.filter(|phrase| !phrase.is_empty())
		.collect();
}
