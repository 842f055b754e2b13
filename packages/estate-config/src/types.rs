use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Browser origins allowed to call the API. Empty disables CORS headers.
	#[serde(default)]
	pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	/// Upper bound for a single search round trip (page plus count).
	pub query_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	pub max_page_limit: u32,
	/// Logical sort keys mapped to storage attribute names. Keys missing here pass through.
	#[serde(default = "default_sort_aliases")]
	pub sort_aliases: BTreeMap<String, String>,
}

pub fn default_sort_aliases() -> BTreeMap<String, String> {
	BTreeMap::from([
		("area".to_string(), "carpetAreaValue".to_string()),
		("price".to_string(), "priceValue".to_string()),
	])
}
