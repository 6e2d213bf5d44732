use serde::Serialize;
use serde_json::{Map, Value};

use crate::SearchProvider;
use tira_config::{Config, Partition};

/// A retrieved record attributed to the partition whose search returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
	pub id: String,
	pub score: f32,
	pub fields: Map<String, Value>,
	pub partition: String,
	pub record_type: String,
}

/// Runs one search against `partition`. Failures are logged and yield no hits so the remaining
/// partitions can still contribute context.
pub async fn search_partition(
	provider: &dyn SearchProvider,
	cfg: &Config,
	partition: &Partition,
	query: &str,
) -> Vec<Hit> {
	match provider.search(&cfg.providers.search, &partition.name, query, cfg.search.top_k).await {
		Ok(raw) => {
			tracing::debug!(partition = %partition.name, hits = raw.len(), "Partition searched.");

			raw.into_iter()
				.map(|hit| Hit {
					id: hit.id,
					score: hit.score,
					fields: hit.fields,
					partition: partition.name.clone(),
					record_type: partition.record_type.clone(),
				})
				.collect()
		},
		Err(err) => {
			tracing::warn!(
				partition = %partition.name,
				error = %err,
				"Partition search failed; continuing without it."
			);

			Vec::new()
		},
	}
}

/// Searches each partition in order, one call per partition.
pub async fn search_partitions(
	provider: &dyn SearchProvider,
	cfg: &Config,
	partitions: &[&Partition],
	query: &str,
) -> Vec<Vec<Hit>> {
	let mut out = Vec::with_capacity(partitions.len());

	for partition in partitions {
		out.push(search_partition(provider, cfg, partition, query).await);
	}

	out
}
