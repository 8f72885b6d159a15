use rqm_domain::EntityKind;
use rqm_storage::search::{Column, Predicate, PredicateValue};

use crate::search::SearchFilters;

/// Predicates `filters` imposes on one kind. Fields that do not apply to `kind` are dropped.
pub fn predicates_for(kind: EntityKind, filters: &SearchFilters) -> Vec<Predicate> {
	let mut predicates = Vec::new();
	let planning_entity =
		matches!(kind, EntityKind::Epic | EntityKind::UserStory | EntityKind::Requirement);

	if planning_entity {
		push_uuid(&mut predicates, Column::CreatorId, filters.creator_id);
		push_uuid(&mut predicates, Column::AssigneeId, filters.assignee_id);

		if let Some(priority) = filters.priority {
			predicates.push(Predicate::Equals {
				column: Column::Priority,
				value: PredicateValue::Integer(priority),
			});
		}
		if let Some(status) = &filters.status {
			predicates.push(Predicate::Equals {
				column: Column::Status,
				value: PredicateValue::Text(status.clone()),
			});
		}
	}

	match kind {
		EntityKind::UserStory => push_uuid(&mut predicates, Column::EpicId, filters.epic_id),
		EntityKind::AcceptanceCriteria => {
			push_uuid(&mut predicates, Column::UserStoryId, filters.user_story_id);
			push_uuid(&mut predicates, Column::AuthorId, filters.author_id);
		},
		EntityKind::Requirement => {
			push_uuid(&mut predicates, Column::UserStoryId, filters.user_story_id);
			push_uuid(
				&mut predicates,
				Column::AcceptanceCriteriaId,
				filters.acceptance_criteria_id,
			);
			push_uuid(&mut predicates, Column::RequirementTypeId, filters.requirement_type_id);
		},
		_ => {},
	}

	if let Some(from) = filters.created_from {
		predicates.push(Predicate::CreatedFrom(from));
	}
	if let Some(to) = filters.created_to {
		predicates.push(Predicate::CreatedTo(to));
	}

	predicates
}

fn push_uuid(predicates: &mut Vec<Predicate>, column: Column, value: Option<uuid::Uuid>) {
	if let Some(value) = value {
		predicates.push(Predicate::Equals { column, value: PredicateValue::Uuid(value) });
	}
}
