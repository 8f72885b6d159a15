use std::{net::SocketAddr, sync::Arc};

use axum::{
	Router,
	body::Body,
	extract::State,
	http::{HeaderMap, Request, StatusCode},
	middleware::{self, Next},
	response::IntoResponse,
};
use color_eyre::Result;
use reqwest::Client;
use rmcp::{
	ErrorData, ServerHandler,
	handler::server::router::tool::ToolRouter,
	model::{CallToolResult, JsonObject, ServerCapabilities, ServerInfo},
	transport::streamable_http_server::{
		StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
	},
};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::McpAuthState;

const HEADER_AUTHORIZATION: &str = "Authorization";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HttpMethod {
	Get,
	Post,
}

#[derive(Clone)]
struct RqmMcp {
	api_base: String,
	client: Client,
	tool_router: ToolRouter<Self>,
}
impl RqmMcp {
	fn new(api_base: String) -> Self {
		Self { api_base, client: Client::new(), tool_router: Self::tool_router() }
	}

	async fn forward(
		&self,
		method: HttpMethod,
		path: &str,
		params: JsonObject,
	) -> Result<CallToolResult, ErrorData> {
		let url = format!("{}{}", self.api_base, path);
		let request = match method {
			HttpMethod::Get => self.client.get(url).query(&params_to_query(params)),
			HttpMethod::Post => self.client.post(url).json(&Value::Object(params)),
		};
		let response = request.send().await.map_err(|err| {
			ErrorData::internal_error(format!("rqm-api request failed: {err}"), None)
		})?;

		handle_response(response).await
	}
}

#[rmcp::tool_router]
impl RqmMcp {
	#[rmcp::tool(
		name = "rqm_search",
		description = "Search epics, user stories, acceptance criteria and requirements with optional filters, sorting and pagination.",
		input_schema = search_schema()
	)]
	async fn rqm_search(&self, params: JsonObject) -> Result<CallToolResult, ErrorData> {
		self.forward(HttpMethod::Post, "/v1/search", params).await
	}

	#[rmcp::tool(
		name = "rqm_search_cache_invalidate",
		description = "Drop every cached search response so the next search reads fresh data.",
		input_schema = empty_schema()
	)]
	async fn rqm_search_cache_invalidate(
		&self,
		_params: JsonObject,
	) -> Result<CallToolResult, ErrorData> {
		self.forward(HttpMethod::Post, "/v1/search/cache/invalidate", JsonObject::new()).await
	}

	#[rmcp::tool(
		name = "rqm_resources_list",
		description = "List every requirements:// resource, sorted by URI.",
		input_schema = empty_schema()
	)]
	async fn rqm_resources_list(&self, _params: JsonObject) -> Result<CallToolResult, ErrorData> {
		self.forward(HttpMethod::Get, "/v1/resources", JsonObject::new()).await
	}

	#[rmcp::tool(
		name = "rqm_resources_read",
		description = "Read one requirements:// resource: a collection, an entity by UUID or reference id, or requirements://search/<query>.",
		input_schema = resources_read_schema()
	)]
	async fn rqm_resources_read(
		&self,
		mut params: JsonObject,
	) -> Result<CallToolResult, ErrorData> {
		let uri = take_required_string(&mut params, "uri")?;
		let mut query = JsonObject::new();

		query.insert("uri".to_string(), Value::String(uri));

		self.forward(HttpMethod::Get, "/v1/resources/read", query).await
	}

	#[rmcp::tool(
		name = "rqm_references_get",
		description = "Resolve a reference id such as EP-001 or req-45 to its entity.",
		input_schema = references_get_schema()
	)]
	async fn rqm_references_get(
		&self,
		mut params: JsonObject,
	) -> Result<CallToolResult, ErrorData> {
		let reference_id = take_required_string(&mut params, "reference_id")?;
		let path = format!("/v1/references/{}", urlencoding::encode(&reference_id));

		self.forward(HttpMethod::Get, &path, JsonObject::new()).await
	}
}

#[rmcp::tool_handler]
impl ServerHandler for RqmMcp {
	fn get_info(&self) -> ServerInfo {
		ServerInfo {
			instructions: Some(
				"rqm MCP adapter that forwards tool calls to the rqm HTTP API.".to_string(),
			),
			capabilities: ServerCapabilities::builder().enable_tools().build(),
			..Default::default()
		}
	}
}

fn search_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"properties": {
			"query": { "type": "string" },
			"filters": {
				"type": "object",
				"additionalProperties": false,
				"properties": {
					"creator_id": { "type": ["string", "null"], "format": "uuid" },
					"assignee_id": { "type": ["string", "null"], "format": "uuid" },
					"priority": { "type": ["integer", "null"], "minimum": 1, "maximum": 4 },
					"status": { "type": ["string", "null"] },
					"created_from": { "type": ["string", "null"], "format": "date-time" },
					"created_to": { "type": ["string", "null"], "format": "date-time" },
					"epic_id": { "type": ["string", "null"], "format": "uuid" },
					"user_story_id": { "type": ["string", "null"], "format": "uuid" },
					"acceptance_criteria_id": { "type": ["string", "null"], "format": "uuid" },
					"requirement_type_id": { "type": ["string", "null"], "format": "uuid" },
					"author_id": { "type": ["string", "null"], "format": "uuid" }
				}
			},
			"sort_by": {
				"type": "string",
				"enum": ["", "priority", "created_at", "updated_at", "title"]
			},
			"sort_order": { "type": "string", "enum": ["", "asc", "desc"] },
			"limit": { "type": "integer", "minimum": 0, "maximum": 100 },
			"offset": { "type": "integer", "minimum": 0 }
		}
	}))
}

fn empty_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"properties": {}
	}))
}

fn resources_read_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"required": ["uri"],
		"properties": {
			"uri": { "type": "string" }
		}
	}))
}

fn references_get_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": false,
		"required": ["reference_id"],
		"properties": {
			"reference_id": { "type": "string" }
		}
	}))
}

async fn handle_response(response: reqwest::Response) -> Result<CallToolResult, ErrorData> {
	let status = response.status();
	let bytes = response
		.bytes()
		.await
		.map_err(|err| ErrorData::internal_error(format!("rqm-api response error: {err}"), None))?;
	let parsed = serde_json::from_slice::<Value>(&bytes)
		.unwrap_or_else(|_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes) }));

	if status.is_success() {
		Ok(CallToolResult::structured(parsed))
	} else {
		Ok(CallToolResult::structured_error(parsed))
	}
}

async fn mcp_auth_middleware(
	State(auth_state): State<McpAuthState>,
	req: Request<Body>,
	next: Next,
) -> axum::response::Response {
	if !is_authorized(req.headers(), &auth_state) {
		return (
			StatusCode::UNAUTHORIZED,
			"Authentication required for security.auth_mode=static_token with a Bearer token.",
		)
			.into_response();
	}

	next.run(req).await
}

pub async fn serve_mcp(bind_addr: &str, api_base: &str, auth_state: McpAuthState) -> Result<()> {
	let bind_addr: SocketAddr = bind_addr.parse()?;
	let api_base = normalize_api_base(api_base);
	let session_manager: Arc<LocalSessionManager> = Default::default();
	let service = StreamableHttpService::new(
		move || Ok(RqmMcp::new(api_base.clone())),
		session_manager,
		StreamableHttpServerConfig::default(),
	);
	let router = Router::new()
		.fallback_service(service)
		.layer(middleware::from_fn_with_state(auth_state, mcp_auth_middleware));
	let listener = TcpListener::bind(bind_addr).await?;

	tracing::info!(%bind_addr, "MCP server listening.");

	axum::serve(listener, router).await?;

	Ok(())
}

fn is_authorized(headers: &HeaderMap, auth_state: &McpAuthState) -> bool {
	match auth_state {
		McpAuthState::Off => true,
		McpAuthState::StaticToken { bearer_token } =>
			read_bearer_token(headers).is_some_and(|token| token == bearer_token),
	}
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(HEADER_AUTHORIZATION)?.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	(!token.is_empty()).then_some(token)
}

/// Turns `service.http_bind` into a base URL. Wildcard binds are reached over loopback.
fn normalize_api_base(raw: &str) -> String {
	let trimmed = raw.trim().trim_end_matches('/');
	let (scheme, rest) = match trimmed.split_once("://") {
		Some((scheme, rest)) => (scheme, rest),
		None => ("http", trimmed),
	};
	let rest = match rest.strip_prefix("0.0.0.0:").or_else(|| rest.strip_prefix("[::]:")) {
		Some(port) => format!("127.0.0.1:{port}"),
		None => rest.to_string(),
	};

	format!("{scheme}://{rest}")
}

fn params_to_query(params: JsonObject) -> Vec<(String, String)> {
	params
		.into_iter()
		.filter_map(|(key, value)| match value {
			Value::Null => None,
			Value::String(text) => Some((key, text)),
			other => Some((key, other.to_string())),
		})
		.collect()
}

fn take_required_string(params: &mut JsonObject, key: &str) -> Result<String, ErrorData> {
	let value = params
		.remove(key)
		.ok_or_else(|| ErrorData::invalid_params(format!("{key} is required."), None))?;
	let text = value
		.as_str()
		.ok_or_else(|| ErrorData::invalid_params(format!("{key} must be a string."), None))?
		.trim();

	if text.is_empty() {
		return Err(ErrorData::invalid_params(format!("{key} must be non-empty."), None));
	}

	Ok(text.to_string())
}

#[cfg(test)]
mod tests {
	use axum::http::HeaderMap;
	use rmcp::model::JsonObject;
	use serde_json::Value;

	use super::{
		HEADER_AUTHORIZATION, RqmMcp, is_authorized, normalize_api_base, params_to_query,
		take_required_string,
	};
	use crate::McpAuthState;

	fn static_token() -> McpAuthState {
		McpAuthState::StaticToken { bearer_token: "token-a".to_string() }
	}

	#[test]
	fn registers_every_forwarded_tool() {
		let mut names = RqmMcp::tool_router()
			.list_all()
			.into_iter()
			.map(|tool| tool.name.to_string())
			.collect::<Vec<_>>();

		names.sort();

		assert_eq!(
			names,
			[
				"rqm_references_get",
				"rqm_resources_list",
				"rqm_resources_read",
				"rqm_search",
				"rqm_search_cache_invalidate",
			]
		);
	}

	#[test]
	fn off_mode_allows_requests_without_auth_header() {
		assert!(is_authorized(&HeaderMap::new(), &McpAuthState::Off));
	}

	#[test]
	fn static_token_mode_requires_matching_bearer_header() {
		let mut headers = HeaderMap::new();

		assert!(!is_authorized(&headers, &static_token()));

		headers.insert(HEADER_AUTHORIZATION, "Bearer token-a".parse().expect("valid header"));

		assert!(is_authorized(&headers, &static_token()));

		headers.insert(HEADER_AUTHORIZATION, "Bearer token-b".parse().expect("valid header"));

		assert!(!is_authorized(&headers, &static_token()));
	}

	#[test]
	fn static_token_mode_rejects_non_bearer_schemes() {
		let mut headers = HeaderMap::new();

		headers.insert(HEADER_AUTHORIZATION, "bearer token-a".parse().expect("valid header"));

		assert!(!is_authorized(&headers, &static_token()));
	}

	#[test]
	fn wildcard_binds_forward_over_loopback() {
		assert_eq!(normalize_api_base("0.0.0.0:8080"), "http://127.0.0.1:8080");
		assert_eq!(normalize_api_base("[::]:8080/"), "http://127.0.0.1:8080");
		assert_eq!(normalize_api_base("https://api.local:443"), "https://api.local:443");
	}

	#[test]
	fn get_parameters_skip_nulls_and_stringify_scalars() {
		let mut params = JsonObject::new();

		params.insert("uri".to_string(), Value::String("requirements://epics".to_string()));
		params.insert("limit".to_string(), Value::from(5));
		params.insert("skip".to_string(), Value::Null);

		let mut query = params_to_query(params);

		query.sort();

		assert_eq!(
			query,
			vec![
				("limit".to_string(), "5".to_string()),
				("uri".to_string(), "requirements://epics".to_string()),
			]
		);
	}

	#[test]
	fn required_strings_are_trimmed_and_non_empty() {
		let mut params = JsonObject::new();

		params.insert("reference_id".to_string(), Value::String("  EP-001 ".to_string()));

		assert_eq!(take_required_string(&mut params, "reference_id").expect("value"), "EP-001");
		assert!(take_required_string(&mut params, "reference_id").is_err());

		params.insert("uri".to_string(), Value::String("   ".to_string()));

		assert!(take_required_string(&mut params, "uri").is_err());
	}
}
