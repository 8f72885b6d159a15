//! Cross-entity search: option validation, retrieval fan-out, merge, pagination and caching.

pub mod cache;
pub mod filter;
pub mod merge;
pub mod retrieval;

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, RqmService};
use rqm_domain::{EntityKind, prepare_query};

/// Raw search request. String-typed sort fields keep the caller's value for error reporting and
/// cache keying; `validate` turns them into a [`SearchPlan`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
	pub query: String,
	pub filters: SearchFilters,
	pub sort_by: String,
	pub sort_order: String,
	pub limit: i64,
	pub offset: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
	pub creator_id: Option<Uuid>,
	pub assignee_id: Option<Uuid>,
	pub priority: Option<i32>,
	pub status: Option<String>,
	#[serde(with = "crate::time_serde::option")]
	pub created_from: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde::option")]
	pub created_to: Option<OffsetDateTime>,
	pub epic_id: Option<Uuid>,
	pub user_story_id: Option<Uuid>,
	pub acceptance_criteria_id: Option<Uuid>,
	pub requirement_type_id: Option<Uuid>,
	pub author_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
	Priority,
	#[default]
	CreatedAt,
	UpdatedAt,
	Title,
}
impl SortBy {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"" | "created_at" => Some(Self::CreatedAt),
			"priority" => Some(Self::Priority),
			"updated_at" => Some(Self::UpdatedAt),
			"title" => Some(Self::Title),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Priority => "priority",
			Self::CreatedAt => "created_at",
			Self::UpdatedAt => "updated_at",
			Self::Title => "title",
		}
	}
}
impl fmt::Display for SortBy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	Asc,
	#[default]
	Desc,
}
impl SortOrder {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"" | "desc" => Some(Self::Desc),
			"asc" => Some(Self::Asc),
			_ => None,
		}
	}
}

/// Validated, defaulted form of [`SearchOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPlan {
	pub sort_by: SortBy,
	pub sort_order: SortOrder,
	pub limit: usize,
	pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub id: Uuid,
	pub reference_id: String,
	#[serde(rename = "type")]
	pub kind: EntityKind,
	pub title: String,
	pub description: Option<String>,
	pub priority: Option<i32>,
	pub status: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub relevance: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub results: Vec<SearchResult>,
	pub total: u64,
	pub limit: u32,
	pub offset: u64,
	pub query: String,
	#[serde(with = "crate::time_serde")]
	pub executed_at: OffsetDateTime,
}

/// Checks options against the configured limits and fills in defaults.
///
/// A negative offset is clamped to zero; a negative or oversized limit is rejected.
pub fn validate(options: &SearchOptions, cfg: &rqm_config::Search) -> Result<SearchPlan> {
	let sort_by =
		SortBy::parse(&options.sort_by).ok_or_else(|| invalid("sort_by", &options.sort_by))?;
	let sort_order = SortOrder::parse(&options.sort_order)
		.ok_or_else(|| invalid("sort_order", &options.sort_order))?;
	let max_limit = i64::from(cfg.max_limit);
	let limit = match options.limit {
		0 => cfg.default_limit,
		limit if (1..=max_limit).contains(&limit) => limit as u32,
		limit => return Err(invalid("limit", &limit.to_string())),
	};

	if let (Some(from), Some(to)) = (options.filters.created_from, options.filters.created_to)
		&& from > to
	{
		return Err(invalid("filters.created_from", &from.to_string()));
	}

	Ok(SearchPlan {
		sort_by,
		sort_order,
		limit: limit as usize,
		offset: usize::try_from(options.offset.max(0)).unwrap_or(usize::MAX),
	})
}

impl RqmService {
	pub async fn search(&self, options: SearchOptions) -> Result<SearchResponse> {
		let plan = validate(&options, &self.cfg.search)?;
		let key = self.cache.as_ref().and_then(|_| cache::lookup_key(&options));

		if let Some(key) = key.as_deref()
			&& let Some(cached) = cache::read(self.cache.as_deref(), key).await
		{
			return Ok(cached);
		}

		let expression = prepare_query(&options.query);
		let expression = (!expression.is_empty()).then_some(expression.as_str());
		let hits =
			retrieval::retrieve_all(self.store.as_ref(), expression, &options.filters).await?;
		let total = hits.len() as u64;
		let merged = merge::sort_results(hits, plan.sort_by, plan.sort_order);
		let results = merge::paginate(merged, plan.offset, plan.limit);
		let response = SearchResponse {
			results,
			total,
			limit: plan.limit as u32,
			offset: plan.offset as u64,
			query: options.query,
			executed_at: OffsetDateTime::now_utc(),
		};

		if let Some(key) = key.as_deref() {
			cache::write(
				self.cache.as_deref(),
				key,
				&response,
				self.cache_ttl(),
				self.cfg.search.cache.max_payload_bytes,
			)
			.await;
		}

		Ok(response)
	}

	/// Drops every cached search response. Cache failures are logged and reported as zero.
	pub async fn invalidate_search_cache(&self) -> u64 {
		cache::invalidate_all(self.cache.as_deref()).await
	}

	fn cache_ttl(&self) -> time::Duration {
		let seconds = i64::try_from(self.cfg.search.cache.ttl_seconds).unwrap_or(i64::MAX);

		time::Duration::seconds(seconds)
	}
}

fn invalid(field: &str, value: &str) -> Error {
	Error::InvalidOptions { field: field.to_string(), value: value.to_string() }
}
