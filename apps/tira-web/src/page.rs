//! Server-rendered HTML for the query form and report.

use pulldown_cmark::{Event, Options, Parser, html};

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #1f2933; }
h1 { font-size: 1.6rem; }
form { display: flex; flex-direction: column; gap: 0.75rem; }
textarea { font: inherit; padding: 0.75rem; min-height: 5rem; }
button { align-self: flex-start; padding: 0.5rem 1.25rem; font: inherit; cursor: pointer; }
.report { margin-top: 2rem; padding: 1rem 1.5rem; border: 1px solid #d9e2ec; border-radius: 6px; }
.report.warning { border-color: #f0b429; background: #fffbea; }
table { border-collapse: collapse; }
th, td { border: 1px solid #d9e2ec; padding: 0.35rem 0.6rem; text-align: left; }";

/// Renders the whole page. `report` is Markdown; warnings (text starting with ⚠️) get their own
/// styling.
pub fn render(query: &str, report: Option<&str>) -> String {
	let mut out = String::with_capacity(4_096);

	out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
	out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
	out.push_str("<title>Trade Intelligence Search</title>\n<style>\n");
	out.push_str(STYLE);
	out.push_str("\n</style>\n</head>\n<body>\n<h1>Trade Intelligence Search</h1>\n");
	out.push_str("<form method=\"post\" action=\"/\">\n");
	out.push_str(
		"<textarea name=\"query\" placeholder=\"e.g. list top exporters in electronics\" required>",
	);
	out.push_str(&escape_html(query));
	out.push_str("</textarea>\n<button type=\"submit\">Search</button>\n</form>\n");

	if let Some(report) = report {
		let class = if report.trim_start().starts_with('⚠') { "report warning" } else { "report" };

		out.push_str(&format!("<section class=\"{class}\">\n"));
		out.push_str(&markdown_to_html(report));
		out.push_str("</section>\n");
	}

	out.push_str("</body>\n</html>\n");

	out
}

/// Converts report Markdown to HTML. Raw HTML in the source is shown as text, never emitted.
pub fn markdown_to_html(markdown: &str) -> String {
	let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
	let events = Parser::new_ext(markdown, options).map(|event| match event {
		Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
		other => other,
	});
	let mut out = String::with_capacity(markdown.len() * 3 / 2);

	html::push_html(&mut out, events);

	out
}

fn escape_html(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#39;")
}
