use std::cmp::Ordering;

use crate::Hit;

/// Flattens per-partition hits and orders them by score, highest first.
///
/// The sort is stable: equal scores keep partition order, then the order the search service
/// returned them in. Non-finite scores sink to the end. Nothing is truncated.
pub fn merge(per_partition: Vec<Vec<Hit>>) -> Vec<Hit> {
	let mut hits: Vec<Hit> = per_partition.into_iter().flatten().collect();

	hits.sort_by(|a, b| compare_scores_desc(a.score, b.score));

	hits
}

fn compare_scores_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(false, false) => b.total_cmp(&a),
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
	}
}
