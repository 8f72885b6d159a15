use rqm_domain::EntityKind;
use rqm_storage::models::SearchRow;

use crate::{
	Error, Result,
	search::{SearchFilters, SearchResult, filter},
	store::SearchStore,
};

/// Status reported for acceptance criteria, which have no status column.
pub const ACCEPTANCE_CRITERIA_STATUS: &str = "active";

/// Runs the four adapters concurrently. The first failure wins and drops the others.
pub async fn retrieve_all(
	store: &dyn SearchStore,
	match_expression: Option<&str>,
	filters: &SearchFilters,
) -> Result<Vec<SearchResult>> {
	let (epics, stories, criteria, requirements) = tokio::try_join!(
		retrieve(store, EntityKind::Epic, match_expression, filters),
		retrieve(store, EntityKind::UserStory, match_expression, filters),
		retrieve(store, EntityKind::AcceptanceCriteria, match_expression, filters),
		retrieve(store, EntityKind::Requirement, match_expression, filters),
	)?;
	let mut merged =
		Vec::with_capacity(epics.len() + stories.len() + criteria.len() + requirements.len());

	merged.extend(epics);
	merged.extend(stories);
	merged.extend(criteria);
	merged.extend(requirements);

	Ok(merged)
}

pub async fn retrieve(
	store: &dyn SearchStore,
	kind: EntityKind,
	match_expression: Option<&str>,
	filters: &SearchFilters,
) -> Result<Vec<SearchResult>> {
	let predicates = filter::predicates_for(kind, filters);
	let rows = store.search(kind, match_expression, &predicates).await.map_err(|err| {
		tracing::warn!(error = %err, kind = %kind, "Search retrieval failed.");

		Error::RetrievalFailed { kind }
	})?;

	Ok(rows.into_iter().map(|row| to_result(kind, row)).collect())
}

pub fn to_result(kind: EntityKind, row: SearchRow) -> SearchResult {
	let acceptance_criteria = kind == EntityKind::AcceptanceCriteria;
	let title = match row.title {
		Some(title) if !acceptance_criteria => title,
		_ => row.reference_id.clone(),
	};
	let status = if acceptance_criteria {
		ACCEPTANCE_CRITERIA_STATUS.to_string()
	} else {
		row.status.unwrap_or_default()
	};

	SearchResult {
		id: row.id,
		reference_id: row.reference_id,
		kind,
		title,
		description: row.description,
		priority: if acceptance_criteria { None } else { row.priority },
		status,
		created_at: row.created_at,
		updated_at: row.updated_at,
		relevance: row.relevance.map(|score| score.max(0.0)),
	}
}
