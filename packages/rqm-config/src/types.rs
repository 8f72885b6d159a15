use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
	#[serde(default)]
	pub catalog: Catalog,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub mcp_bind: String,
	pub log_level: String,
	/// Upper bound for a single HTTP request, including every store and cache call it makes.
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Applied when a request passes `limit = 0`.
	#[serde(default = "default_search_limit")]
	pub default_limit: u32,
	/// Requests above this limit are rejected. Never larger than 100.
	#[serde(default = "default_search_max_limit")]
	pub max_limit: u32,
	pub cache: SearchCache,
}

#[derive(Debug, Deserialize)]
pub struct SearchCache {
	pub enabled: bool,
	#[serde(default = "default_cache_ttl_seconds")]
	pub ttl_seconds: u64,
	pub max_payload_bytes: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Catalog {
	/// Entity providers truncate their listing at this many rows.
	pub max_entities_per_provider: u32,
}
impl Default for Catalog {
	fn default() -> Self {
		Self { max_entities_per_provider: 1_000 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// One of `off` or `static_token`. Only the MCP adapter enforces it.
	#[serde(default = "default_auth_mode")]
	pub auth_mode: String,
	pub mcp_token: Option<String>,
}

fn default_request_timeout_ms() -> u64 {
	10_000
}

fn default_search_limit() -> u32 {
	50
}

fn default_search_max_limit() -> u32 {
	100
}

fn default_cache_ttl_seconds() -> u64 {
	300
}

fn default_auth_mode() -> String {
	"off".to_string()
}
