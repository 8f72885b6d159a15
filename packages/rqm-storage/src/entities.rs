//! Typed reads of whole entity rows, used when a resource is fetched by URI.

use sqlx::{FromRow, PgPool, postgres::PgRow};
use uuid::Uuid;

use crate::{
	Error, Result,
	models::{AcceptanceCriteria, Epic, Requirement, RequirementType, UserStory},
};
use rqm_domain::EntityKind;

pub trait EntityTable
where
	Self: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	const TABLE: &'static str;
	const COLUMNS: &'static str;
	/// Whether rows carry a `reference_id` column.
	const HAS_REFERENCE: bool = true;
}
impl EntityTable for Epic {
	const COLUMNS: &'static str =
		"id, reference_id, title, description, priority, status, creator_id, assignee_id, created_at, updated_at";
	const TABLE: &'static str = "epics";
}
impl EntityTable for UserStory {
	const COLUMNS: &'static str =
		"id, reference_id, epic_id, title, description, priority, status, creator_id, assignee_id, created_at, updated_at";
	const TABLE: &'static str = "user_stories";
}
impl EntityTable for AcceptanceCriteria {
	const COLUMNS: &'static str =
		"id, reference_id, user_story_id, description, author_id, created_at, updated_at";
	const TABLE: &'static str = "acceptance_criteria";
}
impl EntityTable for Requirement {
	const COLUMNS: &'static str =
		"id, reference_id, user_story_id, acceptance_criteria_id, type_id, title, description, priority, status, creator_id, assignee_id, created_at, updated_at";
	const TABLE: &'static str = "requirements";
}
impl EntityTable for RequirementType {
	const COLUMNS: &'static str = "id, name, description, created_at, updated_at";
	const HAS_REFERENCE: bool = false;
	const TABLE: &'static str = "requirement_types";
}

pub async fn get<T>(pool: &PgPool, id: Uuid) -> Result<Option<T>>
where
	T: EntityTable,
{
	let sql = format!("SELECT {} FROM {} WHERE id = $1", T::COLUMNS, T::TABLE);
	let row = sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(pool).await?;

	Ok(row)
}

pub async fn find_by_reference<T>(pool: &PgPool, reference_id: &str) -> Result<Option<T>>
where
	T: EntityTable,
{
	if !T::HAS_REFERENCE {
		return Err(Error::InvalidArgument(format!("{} rows have no reference_id.", T::TABLE)));
	}

	let sql = format!(
		"SELECT {} FROM {} WHERE upper(reference_id) = upper($1) LIMIT 1",
		T::COLUMNS,
		T::TABLE
	);
	let row = sqlx::query_as::<_, T>(&sql).bind(reference_id).fetch_optional(pool).await?;

	Ok(row)
}

/// A full row of any kind that has its own table.
#[derive(Debug, Clone)]
pub enum EntityRecord {
	Epic(Epic),
	UserStory(UserStory),
	AcceptanceCriteria(AcceptanceCriteria),
	Requirement(Requirement),
	RequirementType(RequirementType),
}

pub async fn get_record(pool: &PgPool, kind: EntityKind, id: Uuid) -> Result<Option<EntityRecord>> {
	let record = match kind {
		EntityKind::Epic => get::<Epic>(pool, id).await?.map(EntityRecord::Epic),
		EntityKind::UserStory => get::<UserStory>(pool, id).await?.map(EntityRecord::UserStory),
		EntityKind::AcceptanceCriteria =>
			get::<AcceptanceCriteria>(pool, id).await?.map(EntityRecord::AcceptanceCriteria),
		EntityKind::Requirement =>
			get::<Requirement>(pool, id).await?.map(EntityRecord::Requirement),
		EntityKind::RequirementType =>
			get::<RequirementType>(pool, id).await?.map(EntityRecord::RequirementType),
		EntityKind::SteeringDocument => return Err(Error::UnsupportedKind(kind)),
	};

	Ok(record)
}

pub async fn find_record_by_reference(
	pool: &PgPool,
	kind: EntityKind,
	reference_id: &str,
) -> Result<Option<EntityRecord>> {
	let record = match kind {
		EntityKind::Epic =>
			find_by_reference::<Epic>(pool, reference_id).await?.map(EntityRecord::Epic),
		EntityKind::UserStory =>
			find_by_reference::<UserStory>(pool, reference_id).await?.map(EntityRecord::UserStory),
		EntityKind::AcceptanceCriteria =>
			find_by_reference::<AcceptanceCriteria>(pool, reference_id)
				.await?
				.map(EntityRecord::AcceptanceCriteria),
		EntityKind::Requirement => find_by_reference::<Requirement>(pool, reference_id)
			.await?
			.map(EntityRecord::Requirement),
		_ => return Err(Error::UnsupportedKind(kind)),
	};

	Ok(record)
}
