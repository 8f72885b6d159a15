use std::cmp::Ordering;

use crate::search::{SearchResult, SortBy, SortOrder};

pub fn sort_results(
	mut results: Vec<SearchResult>,
	sort_by: SortBy,
	sort_order: SortOrder,
) -> Vec<SearchResult> {
	results.sort_by(|a, b| compare(a, b, sort_by, sort_order));

	results
}

/// Returns `results[offset..offset + limit]`, clipped to the slice bounds.
pub fn paginate(results: Vec<SearchResult>, offset: usize, limit: usize) -> Vec<SearchResult> {
	if offset >= results.len() {
		return Vec::new();
	}

	results.into_iter().skip(offset).take(limit).collect()
}

fn compare(a: &SearchResult, b: &SearchResult, sort_by: SortBy, sort_order: SortOrder) -> Ordering {
	let primary = match sort_by {
		SortBy::Priority => compare_priority(a.priority, b.priority),
		SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
		SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
		SortBy::Title => compare_title(&a.title, &b.title),
	};
	let primary = match sort_order {
		SortOrder::Asc => primary,
		SortOrder::Desc => primary.reverse(),
	};

	// Newest first, then id, so equal keys still order deterministically.
	primary.then_with(|| b.created_at.cmp(&a.created_at)).then_with(|| a.id.cmp(&b.id))
}

// Missing priority ranks after every present one in ascending order.
fn compare_priority(a: Option<i32>, b: Option<i32>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => a.cmp(&b),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn compare_title(a: &str, b: &str) -> Ordering {
	a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
	use time::{Duration, OffsetDateTime, macros::datetime};
	use uuid::Uuid;

	use super::{paginate, sort_results};
	use crate::search::{SearchResult, SortBy, SortOrder};
	use rqm_domain::EntityKind;

	fn result(
		reference_id: &str,
		title: &str,
		priority: Option<i32>,
		age_days: i64,
	) -> SearchResult {
		let created_at: OffsetDateTime = datetime!(2025-06-01 00:00 UTC) - Duration::days(age_days);

		SearchResult {
			id: Uuid::new_v4(),
			reference_id: reference_id.to_string(),
			kind: EntityKind::Epic,
			title: title.to_string(),
			description: None,
			priority,
			status: "draft".to_string(),
			created_at,
			updated_at: created_at,
			relevance: None,
		}
	}

	fn references(results: &[SearchResult]) -> Vec<&str> {
		results.iter().map(|result| result.reference_id.as_str()).collect()
	}

	#[test]
	fn missing_priority_sorts_last_ascending_and_first_descending() {
		let input = vec![
			result("EP-1", "a", None, 0),
			result("EP-2", "b", Some(3), 1),
			result("EP-3", "c", Some(1), 2),
		];
		let asc = sort_results(input.clone(), SortBy::Priority, SortOrder::Asc);
		let desc = sort_results(input, SortBy::Priority, SortOrder::Desc);

		assert_eq!(references(&asc), vec!["EP-3", "EP-2", "EP-1"]);
		assert_eq!(references(&desc), vec!["EP-1", "EP-2", "EP-3"]);
	}

	#[test]
	fn title_sort_ignores_case() {
		let input = vec![
			result("EP-1", "beta", None, 0),
			result("EP-2", "Alpha", None, 0),
			result("EP-3", "alpha", None, 0),
		];
		let sorted = sort_results(input, SortBy::Title, SortOrder::Asc);

		// Case-insensitive ties fall back to byte order, where uppercase sorts first.
		assert_eq!(references(&sorted), vec!["EP-2", "EP-3", "EP-1"]);
	}

	#[test]
	fn equal_keys_break_on_newest_then_id() {
		let mut older = result("EP-1", "same", Some(2), 5);
		let mut newer = result("EP-2", "same", Some(2), 1);
		let mut twin = result("EP-3", "same", Some(2), 1);

		older.id = Uuid::from_u128(3);
		newer.id = Uuid::from_u128(2);
		twin.id = Uuid::from_u128(1);

		let sorted = sort_results(vec![older, newer, twin], SortBy::Priority, SortOrder::Asc);

		assert_eq!(references(&sorted), vec!["EP-3", "EP-2", "EP-1"]);
	}

	#[test]
	fn default_sort_is_newest_first() {
		let input = vec![result("EP-1", "a", None, 3), result("EP-2", "b", None, 1)];
		let sorted = sort_results(input, SortBy::CreatedAt, SortOrder::Desc);

		assert_eq!(references(&sorted), vec!["EP-2", "EP-1"]);
	}

	#[test]
	fn pagination_returns_a_contiguous_slice() {
		let input = (0..5).map(|n| result(&format!("EP-{n}"), "t", None, n)).collect::<Vec<_>>();

		assert_eq!(references(&paginate(input.clone(), 1, 2)), vec!["EP-1", "EP-2"]);
		assert_eq!(references(&paginate(input.clone(), 4, 10)), vec!["EP-4"]);
		assert!(paginate(input, 5, 10).is_empty());
	}
}
