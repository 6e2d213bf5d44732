//! Prompt construction and credential-rotating report generation.

use serde::Serialize;

use crate::{CredentialPool, GenerationProvider, Hit, context};
use tira_config::{Config, Partition, Report};

pub const NO_RECORDS_MESSAGE: &str = "⚠️ No relevant records found.";

const REPORT_SECTIONS: [&str; 4] =
	["Executive Summary", "Ranked Results", "Strategic Insights", "Data Sources Searched"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
	Generated,
	NoRecords,
	Refused,
	CredentialsExhausted,
	GenerationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
	pub outcome: ReportOutcome,
	pub text: String,
	/// Generation calls made, including rate-limited ones.
	pub attempts: usize,
}
impl GeneratedReport {
	fn no_records(outcome: ReportOutcome, attempts: usize) -> Self {
		Self { outcome, text: NO_RECORDS_MESSAGE.to_string(), attempts }
	}
}

pub fn build_prompt(cfg: &Report, query: &str, partitions: &[&Partition], hits: &[Hit]) -> String {
	let sources = partitions
		.iter()
		.map(|partition| partition.name.as_str())
		.collect::<Vec<_>>()
		.join(", ");
	let mut prompt = String::new();

	prompt.push_str("You are a senior trade intelligence analyst.\n\n");
	prompt.push_str(&format!("User Query:\n{query}\n\n"));
	prompt.push_str("Data Sources Searched:\n");

	for partition in partitions {
		prompt.push_str(&format!(
			"- {} (record type: {})\n",
			partition.name, partition.record_type
		));
	}

	prompt.push_str(&format!(
		"\nRetrieved Data ({} records, highest relevance score first):\n{}\n",
		hits.len(),
		context::build_context(hits)
	));
	prompt.push_str("Instructions:\n");
	prompt.push_str(&format!(
		"- If the query does not say how many results it wants, present the top {} results, or every retrieved record when fewer are available.\n",
		cfg.default_result_count
	));
	prompt.push_str("- Rank results by relevance to the query, strongest match first.\n");
	prompt.push_str(
		"- For each result give: name or identifier, country, products or sector, relevance score, and one line on why it matches the query.\n",
	);
	prompt.push_str(
		"- Use only the retrieved records above. Do not invent companies, figures, or sources.\n",
	);
	prompt.push_str(
		"- If none of the retrieved records answer the query, reply only with: No relevant records found.\n",
	);
	prompt.push_str("- Write in a professional trade intelligence style using Markdown.\n");
	prompt.push_str("- Structure the report with these sections, in this order:\n");

	for section in REPORT_SECTIONS {
		prompt.push_str(&format!("  ## {section}\n"));
	}

	prompt.push_str(&format!("- Under Data Sources Searched, list: {sources}.\n"));

	prompt
}

/// Whether `text` is a short non-answer.
///
/// Both conditions must hold: a configured refusal phrase appears, and the text is shorter than
/// `refusal_max_chars`. Long reports that merely mention a phrase are kept.
pub fn is_refusal(cfg: &Report, text: &str) -> bool {
	let trimmed = text.trim();

	if trimmed.chars().count() >= cfg.refusal_max_chars {
		return false;
	}

	let lowered = trimmed.to_lowercase();

	cfg.refusal_phrases.iter().any(|phrase| lowered.contains(&phrase.to_lowercase()))
}

/// Composes the report for `hits`, rotating through the credential pool on rate limits.
///
/// At most one attempt per credential is made. Any error that is not a rate limit ends the
/// request immediately.
pub async fn generate_report(
	provider: &dyn GenerationProvider,
	cfg: &Config,
	pool: &CredentialPool,
	query: &str,
	hits: &[Hit],
	partitions: &[&Partition],
) -> GeneratedReport {
	if hits.is_empty() {
		return GeneratedReport::no_records(ReportOutcome::NoRecords, 0);
	}

	let prompt = build_prompt(&cfg.report, query, partitions, hits);
	let mut last_error = None;

	for attempt in 1..=pool.size() {
		let lease = pool.lease();

		match provider.generate(&cfg.providers.generation, lease.key, &prompt).await {
			Ok(text) => {
				if is_refusal(&cfg.report, &text) {
					tracing::info!(attempt, credential = lease.index, "Model declined to answer.");

					return GeneratedReport::no_records(ReportOutcome::Refused, attempt);
				}

				return GeneratedReport {
					outcome: ReportOutcome::Generated,
					text,
					attempts: attempt,
				};
			},
			Err(err) if err.is_rate_limited() => {
				tracing::warn!(
					attempt,
					credential = lease.index,
					error = %err,
					"Generation credential is rate limited; rotating."
				);

				last_error = Some(err.to_string());
			},
			Err(err) => {
				tracing::error!(
					attempt,
					credential = lease.index,
					error = %err,
					"Generation failed."
				);

				return GeneratedReport {
					outcome: ReportOutcome::GenerationFailed,
					text: format!("⚠️ Report generation failed: {err}"),
					attempts: attempt,
				};
			},
		}
	}

	GeneratedReport {
		outcome: ReportOutcome::CredentialsExhausted,
		text: format!(
			"⚠️ All {} generation credentials are exhausted. Last error: {}",
			pool.size(),
			last_error.as_deref().unwrap_or("unknown")
		),
		attempts: pool.size(),
	}
}
