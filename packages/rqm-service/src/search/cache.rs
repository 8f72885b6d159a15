use time::Duration;

use crate::{
	Error, Result,
	search::{SearchOptions, SearchResponse},
	store::CacheStore,
};

pub const SEARCH_KEY_PREFIX: &str = "search:";
pub const SEARCH_KEY_PATTERN: &str = "search:*";

/// Derives the cache key from the raw options, before any defaults are applied.
pub fn cache_key(options: &SearchOptions) -> Result<String> {
	let encoded = serde_json::to_vec(options).map_err(|err| Error::Storage {
		message: format!("Failed to encode search options: {err}"),
	})?;

	Ok(format!("{SEARCH_KEY_PREFIX}{}", blake3::hash(&encoded).to_hex()))
}

/// Key for a cache that is present. Options that cannot be encoded bypass the cache.
pub fn lookup_key(options: &SearchOptions) -> Option<String> {
	match cache_key(options) {
		Ok(key) => Some(key),
		Err(err) => {
			tracing::warn!(error = %err, "Search cache key unavailable; bypassing cache.");

			None
		},
	}
}

/// Returns the stored response, treating every failure as a miss.
pub async fn read(cache: Option<&dyn CacheStore>, key: &str) -> Option<SearchResponse> {
	let cache = cache?;
	let payload = match cache.get(key).await {
		Ok(Some(payload)) => payload,
		Ok(None) => {
			tracing::debug!(cache_key = key, "Search cache miss.");

			return None;
		},
		Err(err) => {
			tracing::warn!(error = %err, cache_key = key, "Search cache read failed.");

			return None;
		},
	};

	match serde_json::from_str::<SearchResponse>(&payload) {
		Ok(response) => {
			tracing::debug!(cache_key = key, "Search cache hit.");

			Some(response)
		},
		Err(err) => {
			tracing::warn!(error = %err, cache_key = key, "Search cache payload decode failed.");

			None
		},
	}
}

/// Stores `response` best-effort. Oversized payloads and store failures are skipped.
pub async fn write(
	cache: Option<&dyn CacheStore>,
	key: &str,
	response: &SearchResponse,
	ttl: Duration,
	max_payload_bytes: Option<u64>,
) {
	let Some(cache) = cache else {
		return;
	};
	let payload = match serde_json::to_string(response) {
		Ok(payload) => payload,
		Err(err) => {
			tracing::warn!(error = %err, cache_key = key, "Search cache payload encode failed.");

			return;
		},
	};

	if let Some(max) = max_payload_bytes
		&& payload.len() as u64 > max
	{
		tracing::debug!(
			cache_key = key,
			payload_size = payload.len(),
			max_payload_bytes = max,
			"Search cache payload exceeds the size cap."
		);

		return;
	}

	if let Err(err) = cache.set(key, &payload, ttl).await {
		tracing::warn!(error = %err, cache_key = key, "Search cache write failed.");
	}
}

pub async fn invalidate_all(cache: Option<&dyn CacheStore>) -> u64 {
	let Some(cache) = cache else {
		return 0;
	};

	match cache.delete_matching(SEARCH_KEY_PATTERN).await {
		Ok(deleted) => {
			tracing::debug!(deleted, "Search cache invalidated.");

			deleted
		},
		Err(err) => {
			tracing::warn!(error = %err, "Search cache invalidation failed.");

			0
		},
	}
}
