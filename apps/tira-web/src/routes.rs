use axum::{
	Form, Json, Router,
	extract::State,
	http::StatusCode,
	response::{Html, IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{page, state::AppState};
use tira_service::{ReportRequest, ReportResponse};

pub const EMPTY_QUERY_MESSAGE: &str = "⚠️ Please enter a query.";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(index).post(submit))
		.route("/health", get(health))
		.route("/v1/report", post(report))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct QueryForm {
	#[serde(default)]
	pub query: String,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn index() -> Html<String> {
	Html(page::render("", None))
}

async fn submit(State(state): State<AppState>, Form(form): Form<QueryForm>) -> Html<String> {
	if form.query.trim().is_empty() {
		return Html(page::render("", Some(EMPTY_QUERY_MESSAGE)));
	}

	match state.service.report(ReportRequest { query: form.query.clone() }).await {
		Ok(response) => Html(page::render(&response.query, Some(response.report.as_str()))),
		Err(err) => {
			let warning = format!("⚠️ {err}");

			Html(page::render(&form.query, Some(warning.as_str())))
		},
	}
}

async fn report(
	State(state): State<AppState>,
	Json(payload): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
	let response = state.service.report(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<tira_service::Error> for ApiError {
	fn from(err: tira_service::Error) -> Self {
		match err {
			tira_service::Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			tira_service::Error::Config { message } =>
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "invalid_config", message),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
