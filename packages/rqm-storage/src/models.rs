use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Epic {
	pub id: Uuid,
	pub reference_id: String,
	pub title: String,
	pub description: Option<String>,
	pub priority: Option<i32>,
	pub status: String,
	pub creator_id: Uuid,
	pub assignee_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStory {
	pub id: Uuid,
	pub reference_id: String,
	pub epic_id: Uuid,
	pub title: String,
	pub description: Option<String>,
	pub priority: Option<i32>,
	pub status: String,
	pub creator_id: Uuid,
	pub assignee_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AcceptanceCriteria {
	pub id: Uuid,
	pub reference_id: String,
	pub user_story_id: Uuid,
	pub description: Option<String>,
	pub author_id: Uuid,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Requirement {
	pub id: Uuid,
	pub reference_id: String,
	pub user_story_id: Uuid,
	pub acceptance_criteria_id: Option<Uuid>,
	pub type_id: Uuid,
	pub title: String,
	pub description: Option<String>,
	pub priority: Option<i32>,
	pub status: String,
	pub creator_id: Uuid,
	pub assignee_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequirementType {
	pub id: Uuid,
	pub name: String,
	pub description: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// One row of a cross-entity search, shaped the same for every searchable table.
///
/// Acceptance criteria have no title, priority or status; those columns come back as `NULL`.
/// `relevance` is only populated by ranked retrieval.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchRow {
	pub id: Uuid,
	pub reference_id: String,
	pub title: Option<String>,
	pub description: Option<String>,
	pub priority: Option<i32>,
	pub status: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub relevance: Option<f32>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogEntry {
	pub id: Uuid,
	pub reference_id: Option<String>,
	pub title: String,
	pub description: Option<String>,
	pub created_at: OffsetDateTime,
}
