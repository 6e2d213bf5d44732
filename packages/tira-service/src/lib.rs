pub mod classify;
pub mod context;
pub mod credentials;
pub mod generate;
pub mod merge;
pub mod report;
pub mod search;

mod error;

pub use credentials::{CredentialPool, Lease};
pub use error::{Error, Result};
pub use generate::{GeneratedReport, NO_RECORDS_MESSAGE, ReportOutcome};
pub use report::{ReportRequest, ReportResponse};
pub use search::Hit;

use std::{future::Future, pin::Pin, sync::Arc};

use tira_config::{Config, GenerationProviderConfig, SearchProviderConfig};
use tira_providers::{generation, search::SearchHit};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		namespace: &'a str,
		query: &'a str,
		top_k: u32,
	) -> BoxFuture<'a, tira_providers::Result<Vec<SearchHit>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		api_key: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, tira_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub search: Arc<dyn SearchProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}
impl Providers {
	pub fn new(search: Arc<dyn SearchProvider>, generation: Arc<dyn GenerationProvider>) -> Self {
		Self { search, generation }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { search: provider.clone(), generation: provider }
	}
}

pub struct TiraService {
	pub cfg: Config,
	pub providers: Providers,
	pub credentials: CredentialPool,
}
impl TiraService {
	pub fn new(cfg: Config) -> Result<Self> {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Result<Self> {
		let credentials = CredentialPool::new(cfg.providers.generation.api_keys.clone())?;

		Ok(Self { cfg, providers, credentials })
	}
}

struct DefaultProviders;
impl SearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		namespace: &'a str,
		query: &'a str,
		top_k: u32,
	) -> BoxFuture<'a, tira_providers::Result<Vec<SearchHit>>> {
		Box::pin(tira_providers::search::search(cfg, namespace, query, top_k))
	}
}
impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		api_key: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, tira_providers::Result<String>> {
		Box::pin(generation::generate(cfg, api_key, prompt))
	}
}
