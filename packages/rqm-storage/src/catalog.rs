use sqlx::PgPool;

use crate::{Error, Result, models::CatalogEntry, search};
use rqm_domain::EntityKind;

/// Lists catalog entries for one kind, oldest first, truncated at `limit` rows.
pub async fn list_catalog_entries(
	pool: &PgPool,
	kind: EntityKind,
	limit: u32,
) -> Result<Vec<CatalogEntry>> {
	let table = search::table_name(kind)?;
	let columns = match kind {
		EntityKind::Epic | EntityKind::UserStory | EntityKind::Requirement =>
			"id, reference_id, title, description, created_at",
		EntityKind::RequirementType =>
			"id, NULL::text AS reference_id, name AS title, description, created_at",
		_ => return Err(Error::UnsupportedKind(kind)),
	};
	let sql = format!("SELECT {columns} FROM {table} ORDER BY created_at ASC, id ASC LIMIT $1");
	let entries = sqlx::query_as::<_, CatalogEntry>(&sql)
		.bind(i64::from(limit))
		.fetch_all(pool)
		.await?;

	Ok(entries)
}
