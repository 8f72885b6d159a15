//! Postgres-backed key/value cache for serialized search responses.

use sqlx::PgPool;
use time::OffsetDateTime;

use crate::Result;

/// Returns the payload stored under `key` unless it expired before `now`.
pub async fn fetch_cache_payload(
	pool: &PgPool,
	key: &str,
	now: OffsetDateTime,
) -> Result<Option<String>> {
	let payload: Option<String> = sqlx::query_scalar(
		"SELECT payload FROM search_cache WHERE cache_key = $1 AND expires_at > $2",
	)
	.bind(key)
	.bind(now)
	.fetch_optional(pool)
	.await?;

	Ok(payload)
}

pub async fn store_cache_payload(
	pool: &PgPool,
	key: &str,
	payload: &str,
	now: OffsetDateTime,
	expires_at: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"INSERT INTO search_cache (cache_key, payload, created_at, expires_at) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (cache_key) DO UPDATE SET \
         payload = EXCLUDED.payload, \
         created_at = EXCLUDED.created_at, \
         expires_at = EXCLUDED.expires_at",
	)
	.bind(key)
	.bind(payload)
	.bind(now)
	.bind(expires_at)
	.execute(pool)
	.await?;

	Ok(())
}

/// Deletes every entry whose key matches the glob `pattern` and returns the number removed.
pub async fn delete_cache_matching(pool: &PgPool, pattern: &str) -> Result<u64> {
	let like = glob_to_like(pattern);
	let result = sqlx::query("DELETE FROM search_cache WHERE cache_key LIKE $1 ESCAPE '\\'")
		.bind(like)
		.execute(pool)
		.await?;

	Ok(result.rows_affected())
}

/// Translates a `*`/`?` glob into a `LIKE` pattern escaped with `\`.
pub fn glob_to_like(pattern: &str) -> String {
	let mut out = String::with_capacity(pattern.len() + 4);

	for ch in pattern.chars() {
		match ch {
			'*' => out.push('%'),
			'?' => out.push('_'),
			'%' | '_' | '\\' => {
				out.push('\\');
				out.push(ch);
			},
			_ => out.push(ch),
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::glob_to_like;

	#[test]
	fn glob_wildcards_become_like_wildcards() {
		assert_eq!(glob_to_like("search:*"), "search:%");
		assert_eq!(glob_to_like("search:?bc"), "search:_bc");
	}

	#[test]
	fn like_metacharacters_are_escaped() {
		assert_eq!(glob_to_like("a_b%c\\d*"), "a\\_b\\%c\\\\d%");
	}
}
