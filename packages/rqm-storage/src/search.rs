//! Store side of cross-entity retrieval: per-table SQL for ranked and filter-only searches.

use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, models::SearchRow};
use rqm_domain::{
	EntityKind,
	query::{AND_OPERATOR, PREFIX_MATCH_MARKER},
};

const TEXT_SEARCH_CONFIG: &str = "'english'";

/// Columns a filter predicate may constrain. The set is closed so no caller-provided text ever
/// reaches the SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
	CreatorId,
	AssigneeId,
	AuthorId,
	Priority,
	Status,
	EpicId,
	UserStoryId,
	AcceptanceCriteriaId,
	RequirementTypeId,
}
impl Column {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::CreatorId => "creator_id",
			Self::AssigneeId => "assignee_id",
			Self::AuthorId => "author_id",
			Self::Priority => "priority",
			Self::Status => "status",
			Self::EpicId => "epic_id",
			Self::UserStoryId => "user_story_id",
			Self::AcceptanceCriteriaId => "acceptance_criteria_id",
			Self::RequirementTypeId => "type_id",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
	Uuid(Uuid),
	Integer(i32),
	Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
	Equals { column: Column, value: PredicateValue },
	CreatedFrom(OffsetDateTime),
	CreatedTo(OffsetDateTime),
}

pub(crate) fn table_name(kind: EntityKind) -> Result<&'static str> {
	match kind {
		EntityKind::Epic => Ok("epics"),
		EntityKind::UserStory => Ok("user_stories"),
		EntityKind::AcceptanceCriteria => Ok("acceptance_criteria"),
		EntityKind::Requirement => Ok("requirements"),
		EntityKind::RequirementType => Ok("requirement_types"),
		EntityKind::SteeringDocument => Err(Error::UnsupportedKind(kind)),
	}
}

/// Text the full-text index covers. Matches the GIN expression indexes in `sql/tables`.
pub fn search_document(kind: EntityKind) -> Result<&'static str> {
	match kind {
		EntityKind::Epic | EntityKind::UserStory | EntityKind::Requirement =>
			Ok("reference_id || ' ' || title || ' ' || COALESCE(description, '')"),
		EntityKind::AcceptanceCriteria => Ok("reference_id || ' ' || COALESCE(description, '')"),
		_ => Err(Error::UnsupportedKind(kind)),
	}
}

fn search_columns(kind: EntityKind) -> Result<&'static str> {
	match kind {
		EntityKind::Epic | EntityKind::UserStory | EntityKind::Requirement => Ok(
			"id, reference_id, title, description, priority, status, created_at, updated_at",
		),
		EntityKind::AcceptanceCriteria => Ok(
			"id, reference_id, NULL::text AS title, description, NULL::integer AS priority, NULL::text AS status, created_at, updated_at",
		),
		_ => Err(Error::UnsupportedKind(kind)),
	}
}

/// Builds the retrieval statement for one searchable table.
///
/// With `match_expression` the rows must satisfy the `to_tsquery` conjunction and carry a
/// `ts_rank` relevance. Without it only the predicates apply and relevance is `NULL`.
pub fn build_search_query(
	kind: EntityKind,
	match_expression: Option<&str>,
	predicates: &[Predicate],
) -> Result<QueryBuilder<'static, Postgres>> {
	let table = table_name(kind)?;
	let columns = search_columns(kind)?;
	let document = search_document(kind)?;
	let mut builder = QueryBuilder::new("SELECT ");

	builder.push(columns);

	match match_expression.map(quote_prefix_expression) {
		Some(Some(expression)) => {
			let vector = format!("to_tsvector({TEXT_SEARCH_CONFIG}, {document})");
			let query = format!("to_tsquery({TEXT_SEARCH_CONFIG}, ");

			builder
				.push(format!(", ts_rank({vector}, {query}"))
				.push_bind(expression.clone())
				.push("))::real AS relevance FROM ")
				.push(table)
				.push(format!(" WHERE {vector} @@ {query}"))
				.push_bind(expression)
				.push(")");
		},
		Some(None) => {
			builder.push(", NULL::real AS relevance FROM ").push(table).push(" WHERE FALSE");
		},
		None => {
			builder.push(", NULL::real AS relevance FROM ").push(table).push(" WHERE TRUE");
		},
	}

	for predicate in predicates {
		push_predicate(&mut builder, predicate);
	}

	builder.push(" ORDER BY created_at DESC, id ASC");

	Ok(builder)
}

/// Rewrites a `t1:* & t2:*` expression so every token reaches `to_tsquery` as a quoted lexeme.
///
/// Operator characters inside a token are then plain text to the parser. Tokens without any
/// alphanumeric character are dropped; `None` means nothing is left to match.
pub fn quote_prefix_expression(expression: &str) -> Option<String> {
	let tokens = expression
		.split(AND_OPERATOR)
		.map(|token| token.strip_suffix(PREFIX_MATCH_MARKER).unwrap_or(token))
		.filter(|token| token.chars().any(char::is_alphanumeric))
		.map(|token| {
			let escaped = token.replace('\\', "\\\\").replace('\'', "''");

			format!("'{escaped}'{PREFIX_MATCH_MARKER}")
		})
		.collect::<Vec<_>>();

	(!tokens.is_empty()).then(|| tokens.join(AND_OPERATOR))
}

pub async fn search_entities(
	pool: &PgPool,
	kind: EntityKind,
	match_expression: Option<&str>,
	predicates: &[Predicate],
) -> Result<Vec<SearchRow>> {
	let mut builder = build_search_query(kind, match_expression, predicates)?;
	let rows = builder.build_query_as::<SearchRow>().fetch_all(pool).await?;

	Ok(rows)
}

/// Looks up one row by reference identifier, ignoring case.
pub async fn find_by_reference(
	pool: &PgPool,
	kind: EntityKind,
	reference_id: &str,
) -> Result<Option<SearchRow>> {
	let table = table_name(kind)?;
	let columns = search_columns(kind)?;
	let sql = format!(
		"SELECT {columns}, NULL::real AS relevance FROM {table} WHERE upper(reference_id) = upper($1) LIMIT 1"
	);
	let row = sqlx::query_as::<_, SearchRow>(&sql).bind(reference_id).fetch_optional(pool).await?;

	Ok(row)
}

fn push_predicate(builder: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
	match predicate {
		Predicate::Equals { column, value } => {
			builder.push(" AND ").push(column.as_sql()).push(" = ");

			match value {
				PredicateValue::Uuid(value) => builder.push_bind(*value),
				PredicateValue::Integer(value) => builder.push_bind(*value),
				PredicateValue::Text(value) => builder.push_bind(value.clone()),
			};
		},
		Predicate::CreatedFrom(from) => {
			builder.push(" AND created_at >= ").push_bind(*from);
		},
		Predicate::CreatedTo(to) => {
			builder.push(" AND created_at <= ").push_bind(*to);
		},
	}
}
