use std::any::Any;

use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::{
		HeaderMap, HeaderValue, Method, StatusCode,
		header::{CONTENT_TYPE, ETAG, IF_NONE_MATCH},
	},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_http::{
	catch_panic::CatchPanicLayer,
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

use estate_service::{Error, RequestInfo, SearchOutcome, SearchRequest};

use crate::state::AppState;

const VALIDATION_MESSAGE: &str = "Invalid input provided";
const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";
const VALIDATION_REQUEST_INFO: &str = "N/A on validation fail";

pub fn router(state: AppState) -> Router {
	let cors = cors(&state.service.cfg.service.cors_allowed_origins);

	Router::new()
		.route("/health", get(health))
		.route("/api/properties/search", post(search))
		.with_state(state)
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.layer(CatchPanicLayer::custom(panic_response))
}

/// No CORS headers unless at least one valid origin is configured.
fn cors(origins: &[String]) -> CorsLayer {
	let origins: Vec<HeaderValue> =
		origins.iter().filter_map(|origin| HeaderValue::from_str(origin).ok()).collect();

	if origins.is_empty() {
		return CorsLayer::new();
	}

	CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers([CONTENT_TYPE, IF_NONE_MATCH])
		.expose_headers([ETAG])
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
	let Json(payload) =
		payload.map_err(|rejection| ApiError::validation("body", rejection.body_text()))?;
	let validator = headers.get(IF_NONE_MATCH).and_then(|value| value.to_str().ok());
	let search_query = payload.search_query.clone();
	let outcome = state
		.service
		.search(payload, validator)
		.await
		.map_err(|err| ApiError::from_service(err, search_query.as_deref()))?;
	let response = match outcome {
		SearchOutcome::NotModified { etag } =>
			(StatusCode::NOT_MODIFIED, [(ETAG, etag)]).into_response(),
		SearchOutcome::Full { etag, response } => ([(ETAG, etag)], Json(*response)).into_response(),
	};

	Ok(response)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
	let detail = if let Some(message) = panic.downcast_ref::<String>() {
		message.as_str()
	} else if let Some(message) = panic.downcast_ref::<&str>() {
		*message
	} else {
		"non-string panic payload"
	};

	tracing::error!(panic = %detail, "Request handler panicked.");

	ApiError::internal(RequestInfo::echo(None)).into_response()
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
	success: bool,
	error: ErrorBody,
	data: Option<()>,
	metadata: ErrorMetadata,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	code: &'static str,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	details: Option<ErrorDetails>,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
	#[serde(skip_serializing_if = "Option::is_none")]
	field: Option<String>,
	issue: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorMetadata {
	request_info: RequestInfo,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	code: &'static str,
	message: String,
	details: Option<ErrorDetails>,
	request_info: RequestInfo,
}
impl ApiError {
	fn validation(field: impl Into<String>, issue: impl Into<String>) -> Self {
		Self {
			status: StatusCode::BAD_REQUEST,
			code: "VALIDATION_ERROR",
			message: VALIDATION_MESSAGE.to_string(),
			details: Some(ErrorDetails { field: Some(field.into()), issue: issue.into() }),
			request_info: RequestInfo { search_query: VALIDATION_REQUEST_INFO.to_string() },
		}
	}

	fn internal(request_info: RequestInfo) -> Self {
		Self {
			status: StatusCode::INTERNAL_SERVER_ERROR,
			code: "INTERNAL_ERROR",
			message: INTERNAL_MESSAGE.to_string(),
			details: None,
			request_info,
		}
	}

	fn from_service(err: Error, search_query: Option<&str>) -> Self {
		let request_info = RequestInfo::echo(search_query);

		match err {
			Error::Validation { field, issue } => Self::validation(field, issue),
			Error::Query { field, message } => {
				tracing::warn!(field = %field, error = %message, "Listing query rejected.");

				Self {
					status: StatusCode::BAD_REQUEST,
					code: "QUERY_ERROR",
					message: "The search could not be executed.".to_string(),
					details: Some(ErrorDetails { field: Some(field), issue: message }),
					request_info,
				}
			},
			Error::QueryTimeout { timeout_ms } => {
				tracing::warn!(timeout_ms, "Listing query timed out.");

				Self {
					status: StatusCode::GATEWAY_TIMEOUT,
					code: "QUERY_TIMEOUT",
					message: "The search took too long to complete.".to_string(),
					details: Some(ErrorDetails {
						field: None,
						issue: format!("Query exceeded {timeout_ms} ms."),
					}),
					request_info,
				}
			},
			Error::Storage { .. } | Error::Fingerprint { .. } => {
				tracing::error!(error = %err, "Search failed.");

				Self::internal(request_info)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorEnvelope {
			success: false,
			error: ErrorBody { code: self.code, message: self.message, details: self.details },
			data: None,
			metadata: ErrorMetadata { request_info: self.request_info },
		};

		(self.status, Json(body)).into_response()
	}
}
