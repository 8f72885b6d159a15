//! Seams between the service and its backing stores, plus the Postgres implementations.

use serde_json::{Value, json};
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use crate::{BoxFuture, Error, Result};
use rqm_domain::EntityKind;
use rqm_storage::{
	cache, catalog,
	db::Db,
	entities::{self, EntityRecord},
	models::{CatalogEntry, SearchRow},
	search::{self, Predicate},
};

/// How a single entity is addressed when it is read in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLookup<'a> {
	Id(Uuid),
	Reference(&'a str),
}

/// Read-only access to the entity tables.
pub trait SearchStore
where
	Self: Send + Sync,
{
	/// Rows of one searchable kind. `match_expression` selects the ranked path.
	fn search<'a>(
		&'a self,
		kind: EntityKind,
		match_expression: Option<&'a str>,
		predicates: &'a [Predicate],
	) -> BoxFuture<'a, Result<Vec<SearchRow>>>;

	fn find_by_reference<'a>(
		&'a self,
		kind: EntityKind,
		reference_id: &'a str,
	) -> BoxFuture<'a, Result<Option<SearchRow>>>;

	fn list_catalog(
		&self,
		kind: EntityKind,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<CatalogEntry>>>;

	/// The full entity as a JSON document, or `None` when nothing matches.
	fn fetch_entity<'a>(
		&'a self,
		kind: EntityKind,
		lookup: EntityLookup<'a>,
	) -> BoxFuture<'a, Result<Option<Value>>>;
}

/// Key/value store holding serialized search responses.
pub trait CacheStore
where
	Self: Send + Sync,
{
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>>;

	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> BoxFuture<'a, Result<()>>;

	/// Removes every key matching a `*`/`?` glob and returns how many were removed.
	fn delete_matching<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, Result<u64>>;
}

#[derive(Clone)]
pub struct PgSearchStore {
	db: Db,
}
impl PgSearchStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
impl SearchStore for PgSearchStore {
	fn search<'a>(
		&'a self,
		kind: EntityKind,
		match_expression: Option<&'a str>,
		predicates: &'a [Predicate],
	) -> BoxFuture<'a, Result<Vec<SearchRow>>> {
		Box::pin(async move {
			Ok(search::search_entities(&self.db.pool, kind, match_expression, predicates).await?)
		})
	}

	fn find_by_reference<'a>(
		&'a self,
		kind: EntityKind,
		reference_id: &'a str,
	) -> BoxFuture<'a, Result<Option<SearchRow>>> {
		Box::pin(
			async move { Ok(search::find_by_reference(&self.db.pool, kind, reference_id).await?) },
		)
	}

	fn list_catalog(
		&self,
		kind: EntityKind,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<CatalogEntry>>> {
		Box::pin(
			async move { Ok(catalog::list_catalog_entries(&self.db.pool, kind, limit).await?) },
		)
	}

	fn fetch_entity<'a>(
		&'a self,
		kind: EntityKind,
		lookup: EntityLookup<'a>,
	) -> BoxFuture<'a, Result<Option<Value>>> {
		Box::pin(async move {
			let record = match lookup {
				EntityLookup::Id(id) => entities::get_record(&self.db.pool, kind, id).await?,
				EntityLookup::Reference(reference_id) =>
					entities::find_record_by_reference(&self.db.pool, kind, reference_id).await?,
			};

			record.map(record_json).transpose()
		})
	}
}

#[derive(Clone)]
pub struct PgCacheStore {
	db: Db,
}
impl PgCacheStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
impl CacheStore for PgCacheStore {
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
		Box::pin(async move {
			Ok(cache::fetch_cache_payload(&self.db.pool, key, OffsetDateTime::now_utc()).await?)
		})
	}

	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();

			Ok(cache::store_cache_payload(&self.db.pool, key, value, now, now + ttl).await?)
		})
	}

	fn delete_matching<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(cache::delete_cache_matching(&self.db.pool, pattern).await?) })
	}
}

fn record_json(record: EntityRecord) -> Result<Value> {
	let value = match record {
		EntityRecord::Epic(epic) => json!({
			"id": epic.id,
			"reference_id": epic.reference_id,
			"type": EntityKind::Epic,
			"title": epic.title,
			"description": epic.description,
			"priority": epic.priority,
			"status": epic.status,
			"creator_id": epic.creator_id,
			"assignee_id": epic.assignee_id,
			"created_at": timestamp(epic.created_at)?,
			"updated_at": timestamp(epic.updated_at)?,
		}),
		EntityRecord::UserStory(story) => json!({
			"id": story.id,
			"reference_id": story.reference_id,
			"type": EntityKind::UserStory,
			"epic_id": story.epic_id,
			"title": story.title,
			"description": story.description,
			"priority": story.priority,
			"status": story.status,
			"creator_id": story.creator_id,
			"assignee_id": story.assignee_id,
			"created_at": timestamp(story.created_at)?,
			"updated_at": timestamp(story.updated_at)?,
		}),
		EntityRecord::AcceptanceCriteria(criteria) => json!({
			"id": criteria.id,
			"reference_id": criteria.reference_id,
			"type": EntityKind::AcceptanceCriteria,
			"user_story_id": criteria.user_story_id,
			"description": criteria.description,
			"author_id": criteria.author_id,
			"created_at": timestamp(criteria.created_at)?,
			"updated_at": timestamp(criteria.updated_at)?,
		}),
		EntityRecord::Requirement(requirement) => json!({
			"id": requirement.id,
			"reference_id": requirement.reference_id,
			"type": EntityKind::Requirement,
			"user_story_id": requirement.user_story_id,
			"acceptance_criteria_id": requirement.acceptance_criteria_id,
			"type_id": requirement.type_id,
			"title": requirement.title,
			"description": requirement.description,
			"priority": requirement.priority,
			"status": requirement.status,
			"creator_id": requirement.creator_id,
			"assignee_id": requirement.assignee_id,
			"created_at": timestamp(requirement.created_at)?,
			"updated_at": timestamp(requirement.updated_at)?,
		}),
		EntityRecord::RequirementType(kind) => json!({
			"id": kind.id,
			"type": EntityKind::RequirementType,
			"name": kind.name,
			"description": kind.description,
			"created_at": timestamp(kind.created_at)?,
			"updated_at": timestamp(kind.updated_at)?,
		}),
	};

	Ok(value)
}

fn timestamp(value: OffsetDateTime) -> Result<String> {
	value
		.format(&Rfc3339)
		.map_err(|err| Error::Storage { message: format!("Failed to format timestamp: {err}") })
}
