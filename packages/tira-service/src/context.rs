use serde_json::Value;

use crate::Hit;

const RECORD_SEPARATOR: &str = "------------------------";

/// Renders merged hits as the plain-text context block of the generation prompt.
pub fn build_context(hits: &[Hit]) -> String {
	let mut out = String::new();

	for hit in hits {
		out.push_str(&format!("ID: {}\n", hit.id));
		out.push_str(&format!("Source: {} ({})\n", hit.partition, hit.record_type));
		out.push_str(&format!("Score: {:.4}\n", hit.score));

		if hit.fields.is_empty() {
			out.push_str("Details: none\n");
		} else {
			out.push_str("Details:\n");

			for (name, value) in &hit.fields {
				out.push_str(&format!("  {name}: {}\n", render_value(value)));
			}
		}

		out.push_str(RECORD_SEPARATOR);
		out.push('\n');
	}

	out
}

fn render_value(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Array(items) if items.iter().all(Value::is_string) =>
			items.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "),
		other => other.to_string(),
	}
}
