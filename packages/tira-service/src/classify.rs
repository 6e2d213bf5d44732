//! Keyword routing of a query to the partitions worth searching.

use tira_config::Partition;

/// Selects every partition whose keywords occur in `query`, case-insensitively.
///
/// Output follows the configured partition order. A query that matches no keyword selects all
/// partitions, so broad questions search everything instead of nothing.
pub fn classify<'a>(partitions: &'a [Partition], query: &str) -> Vec<&'a Partition> {
	let query = query.to_lowercase();
	let matched: Vec<&Partition> =
		partitions.iter().filter(|partition| matches_any(partition, &query)).collect();

	if matched.is_empty() { partitions.iter().collect() } else { matched }
}

fn matches_any(partition: &Partition, lowered_query: &str) -> bool {
	partition.keywords.iter().any(|keyword| {
		let keyword = keyword.trim().to_lowercase();

		!keyword.is_empty() && lowered_query.contains(&keyword)
	})
}
