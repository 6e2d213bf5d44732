//! Stub providers and fixtures for exercising the report pipeline without network access.

use std::{
	collections::{HashMap, VecDeque},
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::{Map, Value};

use tira_config::{Config, GenerationProviderConfig, SearchProviderConfig};
use tira_providers::{Error, search::SearchHit};
use tira_service::{BoxFuture, GenerationProvider, Providers, SearchProvider, TiraService};

pub const TEST_KEYS: [&str; 3] = ["key-a", "key-b", "key-c"];

/// Default partitions, three generation keys, and unroutable provider endpoints.
pub fn test_config() -> Config {
	let mut cfg = Config::default();

	cfg.service.port = 0;
	cfg.providers.search.api_key = "pc-test".to_string();
	cfg.providers.search.index = "trade-intel".to_string();
	cfg.providers.search.index_host = Some("http://127.0.0.1:1".to_string());
	cfg.providers.search.timeout_ms = 1_000;
	cfg.providers.generation.api_base = "http://127.0.0.1:1".to_string();
	cfg.providers.generation.api_keys = TEST_KEYS.iter().map(|key| key.to_string()).collect();
	cfg.providers.generation.timeout_ms = 1_000;

	cfg
}

pub fn service(
	cfg: Config,
	search: Arc<StubSearch>,
	generation: Arc<ScriptedGeneration>,
) -> TiraService {
	TiraService::with_providers(cfg, Providers::new(search, generation))
		.expect("Test service must build.")
}

pub fn hit(id: &str, score: f32) -> SearchHit {
	let mut fields = Map::new();

	fields.insert("name".to_string(), Value::String(format!("Company {id}")));

	SearchHit { id: id.to_string(), score, fields }
}

enum StubResponse {
	Hits(Vec<SearchHit>),
	Fail(String),
}

/// Search stub answering per namespace. Unknown namespaces return no hits.
#[derive(Default)]
pub struct StubSearch {
	responses: HashMap<String, StubResponse>,
	calls: Mutex<Vec<(String, String, u32)>>,
}
impl StubSearch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_hits(mut self, namespace: &str, hits: Vec<SearchHit>) -> Self {
		self.responses.insert(namespace.to_string(), StubResponse::Hits(hits));

		self
	}

	pub fn failing(mut self, namespace: &str, message: &str) -> Self {
		self.responses.insert(namespace.to_string(), StubResponse::Fail(message.to_string()));

		self
	}

	/// Recorded `(namespace, query, top_k)` triples in call order.
	pub fn calls(&self) -> Vec<(String, String, u32)> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn namespaces(&self) -> Vec<String> {
		self.calls().into_iter().map(|(namespace, _, _)| namespace).collect()
	}
}
impl SearchProvider for StubSearch {
	fn search<'a>(
		&'a self,
		_cfg: &'a SearchProviderConfig,
		namespace: &'a str,
		query: &'a str,
		top_k: u32,
	) -> BoxFuture<'a, tira_providers::Result<Vec<SearchHit>>> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).push((
			namespace.to_string(),
			query.to_string(),
			top_k,
		));

		let result = match self.responses.get(namespace) {
			Some(StubResponse::Hits(hits)) => Ok(hits.clone()),
			Some(StubResponse::Fail(message)) =>
				Err(Error::Status { status: 404, body: message.clone() }),
			None => Ok(Vec::new()),
		};

		Box::pin(async move { result })
	}
}

/// One scripted generation outcome.
#[derive(Debug, Clone)]
pub enum Reply {
	Text(String),
	RateLimited,
	Fail { status: u16, body: String },
}
impl Reply {
	pub fn text(text: &str) -> Self {
		Self::Text(text.to_string())
	}

	fn into_result(self) -> tira_providers::Result<String> {
		match self {
			Self::Text(text) => Ok(text),
			Self::RateLimited => Err(Error::Status {
				status: 429,
				body: r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#.to_string(),
			}),
			Self::Fail { status, body } => Err(Error::Status { status, body }),
		}
	}
}

/// Generation stub replaying a script, then repeating `fallback` once the script runs out.
pub struct ScriptedGeneration {
	script: Mutex<VecDeque<Reply>>,
	fallback: Reply,
	keys: Mutex<Vec<String>>,
	prompts: Mutex<Vec<String>>,
	calls: AtomicUsize,
}
impl ScriptedGeneration {
	pub fn new(script: Vec<Reply>, fallback: Reply) -> Self {
		Self {
			script: Mutex::new(script.into()),
			fallback,
			keys: Mutex::new(Vec::new()),
			prompts: Mutex::new(Vec::new()),
			calls: AtomicUsize::new(0),
		}
	}

	pub fn always(reply: Reply) -> Self {
		Self::new(Vec::new(), reply)
	}

	pub fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Credentials used, in call order.
	pub fn keys(&self) -> Vec<String> {
		self.keys.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn last_prompt(&self) -> Option<String> {
		self.prompts.lock().unwrap_or_else(|err| err.into_inner()).last().cloned()
	}
}
impl GenerationProvider for ScriptedGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a GenerationProviderConfig,
		api_key: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, tira_providers::Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.keys.lock().unwrap_or_else(|err| err.into_inner()).push(api_key.to_string());
		self.prompts.lock().unwrap_or_else(|err| err.into_inner()).push(prompt.to_string());

		let reply = self
			.script
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.pop_front()
			.unwrap_or_else(|| self.fallback.clone());

		Box::pin(async move { reply.into_result() })
	}
}
