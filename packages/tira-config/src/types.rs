use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub search: Search,
	pub report: Report,
	/// Searchable partitions in enumeration order. Classification output and merge tie-breaks
	/// follow this order.
	pub partitions: Vec<Partition>,
}
impl Default for Config {
	fn default() -> Self {
		Self {
			service: Service::default(),
			providers: Providers::default(),
			search: Search::default(),
			report: Report::default(),
			partitions: default_partitions(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub host: String,
	pub port: u16,
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { host: "127.0.0.1".to_string(), port: 5_000, log_level: "info".to_string() }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Providers {
	pub search: SearchProviderConfig,
	pub generation: GenerationProviderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchProviderConfig {
	pub api_key: String,
	pub index: String,
	/// Data-plane host of the index. Resolved from the control plane at startup when unset.
	pub index_host: Option<String>,
	pub control_base: String,
	pub api_version: String,
	pub timeout_ms: u64,
}
impl Default for SearchProviderConfig {
	fn default() -> Self {
		Self {
			api_key: String::new(),
			index: String::new(),
			index_host: None,
			control_base: "https://api.pinecone.io".to_string(),
			api_version: "2025-01".to_string(),
			timeout_ms: 10_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GenerationProviderConfig {
	pub api_base: String,
	pub model: String,
	/// Credential pool, used round-robin. Must be non-empty.
	pub api_keys: Vec<String>,
	pub temperature: f32,
	pub timeout_ms: u64,
}
impl Default for GenerationProviderConfig {
	fn default() -> Self {
		Self {
			api_base: "https://generativelanguage.googleapis.com".to_string(),
			model: "gemini-2.5-flash".to_string(),
			api_keys: Vec::new(),
			temperature: 0.2,
			timeout_ms: 60_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub top_k: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { top_k: 15 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Report {
	/// Result count the model is told to use when the query names none.
	pub default_result_count: u32,
	/// Responses at or above this many characters are never treated as refusals.
	pub refusal_max_chars: usize,
	pub refusal_phrases: Vec<String>,
}
impl Default for Report {
	fn default() -> Self {
		Self {
			default_result_count: 10,
			refusal_max_chars: 200,
			refusal_phrases: [
				"no relevant records",
				"no relevant data",
				"no matching records",
				"insufficient data",
				"not enough information",
				"i cannot find",
				"i could not find",
				"unable to find",
			]
			.into_iter()
			.map(str::to_string)
			.collect(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Partition {
	pub name: String,
	pub record_type: String,
	pub keywords: Vec<String>,
}

pub fn default_partitions() -> Vec<Partition> {
	[
		("exporters", "exporter", &["exporter"][..]),
		("importers", "importer", &["importer", "buyer"][..]),
		("global_news", "news", &["news", "risk"][..]),
	]
	.into_iter()
	.map(|(name, record_type, keywords)| Partition {
		name: name.to_string(),
		record_type: record_type.to_string(),
		keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
	})
	.collect()
}
