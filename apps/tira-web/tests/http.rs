use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use tira_testkit::{Reply, ScriptedGeneration, StubSearch, hit, service, test_config};
use tira_web::{routes, state::AppState};

const REPORT: &str = "## Executive Summary\nTwo exporters match the query.\n\n\
	## Ranked Results\n1. **Company exp-1**\n\n\
	## Data Sources Searched\n- exporters";

fn app(search: Arc<StubSearch>, generation: Arc<ScriptedGeneration>) -> Router {
	routes::router(AppState::with_service(service(test_config(), search, generation)))
}

fn exporters_search() -> Arc<StubSearch> {
	Arc::new(StubSearch::new().with_hits("exporters", vec![hit("exp-1", 0.91), hit("exp-2", 0.6)]))
}

async fn body_text(response: axum::response::Response) -> String {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	String::from_utf8(bytes.to_vec()).expect("Response body must be UTF-8.")
}

fn form_post(body: &str) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/")
		.header("content-type", "application/x-www-form-urlencoded")
		.body(Body::from(body.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let app = app(
		Arc::new(StubSearch::new()),
		Arc::new(ScriptedGeneration::always(Reply::text(REPORT))),
	);
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_renders_empty_form() {
	let app = app(
		Arc::new(StubSearch::new()),
		Arc::new(ScriptedGeneration::always(Reply::text(REPORT))),
	);
	let response = app
		.oneshot(Request::builder().uri("/").body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::OK);

	let html = body_text(response).await;

	assert!(html.contains("name=\"query\""));
	assert!(!html.contains("class=\"report"));
}

#[tokio::test]
async fn post_renders_markdown_report() {
	let search = exporters_search();
	let generation = Arc::new(ScriptedGeneration::always(Reply::text(REPORT)));
	let response = app(search.clone(), generation.clone())
		.oneshot(form_post("query=list+top+exporters+in+electronics"))
		.await
		.expect("Failed to call POST /.");

	assert_eq!(response.status(), StatusCode::OK);

	let html = body_text(response).await;

	assert!(html.contains("<h2>Executive Summary</h2>"));
	assert!(html.contains("<h2>Data Sources Searched</h2>"));
	assert!(html.contains("<section class=\"report\">"));
	assert!(html.contains(">list top exporters in electronics</textarea>"));
	assert_eq!(search.namespaces(), vec!["exporters"]);
	assert_eq!(generation.count(), 1);
}

#[tokio::test]
async fn post_blank_query_warns_without_searching() {
	let search = exporters_search();
	let generation = Arc::new(ScriptedGeneration::always(Reply::text(REPORT)));
	let response = app(search.clone(), generation.clone())
		.oneshot(form_post("query=+++"))
		.await
		.expect("Failed to call POST /.");

	assert_eq!(response.status(), StatusCode::OK);

	let html = body_text(response).await;

	assert!(html.contains("Please enter a query."));
	assert!(html.contains("report warning"));
	assert!(search.calls().is_empty());
	assert_eq!(generation.count(), 0);
}

#[tokio::test]
async fn post_surfaces_generation_failure_as_warning() {
	let generation = Arc::new(ScriptedGeneration::always(Reply::Fail {
		status: 500,
		body: "backend unavailable".to_string(),
	}));
	let response = app(exporters_search(), generation)
		.oneshot(form_post("query=exporter+of+chips"))
		.await
		.expect("Failed to call POST /.");
	let html = body_text(response).await;

	assert!(html.contains("report warning"));
	assert!(html.contains("Report generation failed"));
	assert!(html.contains("backend unavailable"));
}

#[tokio::test]
async fn json_report_returns_structured_response() {
	let generation = Arc::new(ScriptedGeneration::always(Reply::text(REPORT)));
	let payload = serde_json::json!({ "query": "list top exporters in electronics" });
	let response = app(exporters_search(), generation)
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/report")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /v1/report.");

	assert_eq!(response.status(), StatusCode::OK);

	let json: serde_json::Value =
		serde_json::from_str(&body_text(response).await).expect("Failed to parse response.");

	assert_eq!(json["outcome"], "generated");
	assert_eq!(json["partitions"], serde_json::json!(["exporters"]));
	assert_eq!(json["hit_count"], 2);
	assert_eq!(json["report"], REPORT);
	assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn json_report_rejects_blank_query() {
	let generation = Arc::new(ScriptedGeneration::always(Reply::text(REPORT)));
	let payload = serde_json::json!({ "query": "" });
	let response = app(exporters_search(), generation)
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/report")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /v1/report.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json: serde_json::Value =
		serde_json::from_str(&body_text(response).await).expect("Failed to parse response.");

	assert_eq!(json["error_code"], "invalid_request");
}
