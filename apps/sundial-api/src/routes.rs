use axum::{
	Json, Router,
	body::Body,
	extract::{Path, Query, State},
	http::{StatusCode, header},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use sundial_service::{Error as ServiceError, ListQuery, PlotRequest, SundialService, query};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(info))
		.route("/health", get(health))
		.route("/sunshine", get(list))
		.route("/sunshine/list", get(list))
		.route("/sunshine/count", get(count))
		.route("/sunshine/fields", get(fields))
		.route("/sunshine/export", get(export))
		.route("/sunshine/plot/{y_field}/{y_method}/vs/{x_field}", get(plot))
		.with_state(state)
}

/// Raw query parameters, all optional text. Decoding into a [`ListQuery`] is
/// lenient by contract: unparsable values fall back to defaults instead of
/// failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListParams {
	limit: Option<String>,
	start: Option<String>,
	filter: Option<String>,
	search: Option<String>,
	#[serde(rename = "sortField")]
	sort_field: Option<String>,
	#[serde(rename = "sortOrder")]
	sort_order: Option<String>,
}

fn query_from_params(params: ListParams) -> ListQuery {
	let defaults = ListQuery::default();

	ListQuery {
		limit: params
			.limit
			.as_deref()
			.and_then(query::parse_integer)
			.unwrap_or(defaults.limit),
		start: params
			.start
			.as_deref()
			.and_then(query::parse_integer)
			.unwrap_or(defaults.start),
		filter: params
			.filter
			.as_deref()
			.and_then(|raw| serde_json::from_str(raw).ok())
			.unwrap_or_default(),
		search: params.search.unwrap_or_default(),
		sort_field: params
			.sort_field
			.filter(|value| !value.is_empty())
			.unwrap_or(defaults.sort_field),
		sort_order: params
			.sort_order
			.filter(|value| !value.is_empty())
			.unwrap_or(defaults.sort_order),
	}
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn info() -> Response {
	Json(json!({
		"message": "Welcome to the Sundial API. Please feel free to use our endpoints for your applications :)",
		"routes": {
			"info": {
				"endpoint": "/",
				"description": "This page here.",
				"methods": ["GET"],
				"parameters": {},
				"returns": "This page here."
			},
			"sunshine": {
				"endpoint": "/sunshine",
				"description": "Main data route for this API. Used to query aggregated sunshine list data for Canada.",
				"methods": ["GET"],
				"parameters": {
					"limit": "integer - number of entries to return - optional, default: 10",
					"start": "integer - number of entries to skip before returning limit entries - optional, default: 0",
					"filter": "object - URL-encoded JSON filter to apply to the query - optional, default: no filter",
					"search": "string - free-text search to rank entries with - optional, default: none",
					"sortField": "string - field to use for sorting - optional, default: \"year\"",
					"sortOrder": "\"ascending\" | \"descending\" - order of entries to sort - optional, default: \"descending\""
				},
				"returns": "A list of sunshine list entries specific to parameters"
			}
		}
	}))
	.into_response()
}

async fn list(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
	let query = query_from_params(params);

	match state.service.get_list(query).await {
		Ok(records) => Json(records).into_response(),
		Err(err) => storage_failure(&state, "list", err),
	}
}

async fn count(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
	let query = query_from_params(params);

	match state.service.get_count(query).await {
		Ok(count) => Json(count).into_response(),
		Err(err) => storage_failure(&state, "count", err),
	}
}

async fn fields() -> Response {
	Json(SundialService::get_fields()).into_response()
}

async fn export(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
	let query = query_from_params(params);
	let stream = state.service.export_csv(query);

	(
		[
			(header::CONTENT_TYPE, "text/csv"),
			(header::CONTENT_DISPOSITION, "attachment; filename=SundialExport.csv"),
		],
		Body::from_stream(stream),
	)
		.into_response()
}

async fn plot(
	State(state): State<AppState>,
	Path((y_field, y_method, x_field)): Path<(String, String, String)>,
	Query(params): Query<ListParams>,
) -> Response {
	let query = query_from_params(params);
	// Invalid plot parameters deliberately answer 200 with an error payload;
	// existing clients of this API depend on that shape.
	let request = match PlotRequest::parse(&y_field, &y_method, &x_field) {
		Ok(request) => request,
		Err(err) => return plot_failure(err),
	};

	match state.service.get_plot(request, query).await {
		Ok(points) => Json(points).into_response(),
		Err(err @ ServiceError::InvalidRequest { .. }) => plot_failure(err),
		Err(err) => storage_failure(&state, "plot", err),
	}
}

fn plot_failure(err: ServiceError) -> Response {
	(StatusCode::OK, Json(json!({ "error": err.to_string() }))).into_response()
}

fn storage_failure(state: &AppState, route: &str, err: ServiceError) -> Response {
	error!(route, %err, "Read request failed.");

	let detail = if state.service.cfg.service.is_production() {
		"Internal Server Error".to_string()
	} else {
		err.to_string()
	};

	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(json!({
			"error": detail,
			"message": format!(
				"An error was encountered while trying to load the specified {route} of provincial data. Please try again."
			),
		})),
	)
		.into_response()
}
