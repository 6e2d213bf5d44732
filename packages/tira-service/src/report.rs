use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	Error, ReportOutcome, Result, TiraService, classify, generate, merge,
	search::{self, Hit},
};

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
	pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
	pub request_id: Uuid,
	pub query: String,
	/// Partitions searched, in enumeration order.
	pub partitions: Vec<String>,
	pub hit_count: usize,
	pub outcome: ReportOutcome,
	pub report: String,
}

impl TiraService {
	/// Answers one query: route, search, merge, then generate.
	pub async fn report(&self, req: ReportRequest) -> Result<ReportResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let request_id = Uuid::new_v4();
		let partitions = classify::classify(&self.cfg.partitions, query);
		let names: Vec<String> =
			partitions.iter().map(|partition| partition.name.clone()).collect();

		tracing::debug!(%request_id, partitions = ?names, "Query classified.");

		let per_partition =
			search::search_partitions(self.providers.search.as_ref(), &self.cfg, &partitions, query)
				.await;
		let hits: Vec<Hit> = merge::merge(per_partition);
		let generated = generate::generate_report(
			self.providers.generation.as_ref(),
			&self.cfg,
			&self.credentials,
			query,
			&hits,
			&partitions,
		)
		.await;

		tracing::info!(
			%request_id,
			partitions = ?names,
			hits = hits.len(),
			outcome = ?generated.outcome,
			attempts = generated.attempts,
			"Report served."
		);

		Ok(ReportResponse {
			request_id,
			query: query.to_string(),
			partitions: names,
			hit_count: hits.len(),
			outcome: generated.outcome,
			report: generated.text,
		})
	}
}
