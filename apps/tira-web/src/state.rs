use std::sync::Arc;

use tira_config::Config;
use tira_service::TiraService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TiraService>,
}
impl AppState {
	/// Resolves the search index host when it is not configured, then builds the service.
	pub async fn new(mut config: Config) -> color_eyre::Result<Self> {
		if config.providers.search.index_host.is_none() {
			let host = tira_providers::search::resolve_index_host(&config.providers.search).await?;

			tracing::info!(index = %config.providers.search.index, %host, "Search index resolved.");

			config.providers.search.index_host = Some(host);
		}

		let service = TiraService::new(config)?;

		Ok(Self::with_service(service))
	}

	pub fn with_service(service: TiraService) -> Self {
		Self { service: Arc::new(service) }
	}
}
