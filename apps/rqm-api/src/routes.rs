use std::future::Future;

use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use rqm_service::{
	Error, ResourceContent, ResourceDescriptor, SearchOptions, SearchResponse, SearchResult,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/search/cache/invalidate", post(invalidate_search_cache))
		.route("/v1/resources", get(list_resources))
		.route("/v1/resources/read", get(read_resource))
		.route("/v1/references/{reference_id}", get(resolve_reference))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchOptions>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = with_deadline(&state, state.service.search(payload)).await??;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct InvalidateResponse {
	deleted: u64,
}

async fn invalidate_search_cache(
	State(state): State<AppState>,
) -> Result<Json<InvalidateResponse>, ApiError> {
	let deleted = with_deadline(&state, state.service.invalidate_search_cache()).await?;

	Ok(Json(InvalidateResponse { deleted }))
}

#[derive(Debug, Serialize)]
struct ResourcesResponse {
	resources: Vec<ResourceDescriptor>,
}

async fn list_resources(
	State(state): State<AppState>,
) -> Result<Json<ResourcesResponse>, ApiError> {
	let resources = with_deadline(&state, state.service.list_resources()).await?;

	Ok(Json(ResourcesResponse { resources }))
}

#[derive(Debug, Deserialize)]
struct ReadParams {
	uri: String,
}

async fn read_resource(
	State(state): State<AppState>,
	Query(params): Query<ReadParams>,
) -> Result<Json<ResourceContent>, ApiError> {
	let content = with_deadline(&state, state.service.read_resource(&params.uri)).await??;

	Ok(Json(content))
}

async fn resolve_reference(
	State(state): State<AppState>,
	Path(reference_id): Path<String>,
) -> Result<Json<SearchResult>, ApiError> {
	let result = with_deadline(&state, state.service.resolve_reference(&reference_id)).await??;

	Ok(Json(result))
}

async fn with_deadline<F>(state: &AppState, future: F) -> Result<F::Output, ApiError>
where
	F: Future,
{
	tokio::time::timeout(state.request_timeout, future).await.map_err(|_| {
		tracing::warn!(timeout_ms = state.request_timeout.as_millis() as u64, "Request timed out.");

		json_error(StatusCode::GATEWAY_TIMEOUT, "timeout", "Request timed out.", None)
	})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidOptions { field, .. } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_options", message, Some(vec![field])),
			Error::InvalidRequest { .. } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			Error::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::RetrievalFailed { kind } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"retrieval_failed",
				message,
				Some(vec![kind.to_string()]),
			),
			Error::ProviderFailed { .. } | Error::Storage { .. } => {
				tracing::error!(error = %message, "Request failed in storage.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage",
					"Internal storage error.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
