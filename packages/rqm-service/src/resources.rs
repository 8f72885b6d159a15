//! Reading a single catalog URI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
	Error, Result, RqmService,
	catalog::{MIME_JSON, SEARCH_PATH, URI_SCHEME, kind_for_path},
	search::SearchOptions,
	store::EntityLookup,
};
use rqm_domain::{EntityKind, reference};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContent {
	pub uri: String,
	pub mime_type: String,
	pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResourceTarget {
	Collection(EntityKind),
	Entity { kind: EntityKind, key: String },
	Search(String),
}

impl RqmService {
	/// Reads a `requirements://` URI.
	///
	/// Entity URIs accept either the row UUID or a reference id of the matching kind.
	pub async fn read_resource(&self, uri: &str) -> Result<ResourceContent> {
		let content = match parse_uri(uri)? {
			ResourceTarget::Collection(kind) => {
				let limit = self.cfg.catalog.max_entities_per_provider;
				let entries = self.store.list_catalog(kind, limit).await?;
				let items = entries
					.into_iter()
					.map(|entry| {
						serde_json::json!({
							"id": entry.id,
							"reference_id": entry.reference_id,
							"title": entry.title,
							"description": entry.description,
						})
					})
					.collect::<Vec<_>>();

				serde_json::json!({ "type": kind, "items": items })
			},
			ResourceTarget::Entity { kind, key } => self.read_entity(kind, &key).await?,
			ResourceTarget::Search(query) => {
				let response = self.search(SearchOptions { query, ..Default::default() }).await?;

				serde_json::to_value(response).map_err(|err| Error::Storage {
					message: format!("Failed to encode search response: {err}"),
				})?
			},
		};

		Ok(ResourceContent { uri: uri.to_string(), mime_type: MIME_JSON.to_string(), content })
	}

	async fn read_entity(&self, kind: EntityKind, key: &str) -> Result<Value> {
		let lookup = match Uuid::parse_str(key) {
			Ok(id) => EntityLookup::Id(id),
			Err(_) if reference::entity_type_of(key) == Some(kind) =>
				EntityLookup::Reference(key.trim()),
			Err(_) =>
				return Err(Error::InvalidRequest {
					message: format!("{key:?} is neither a UUID nor a {kind} reference id."),
				}),
		};

		self.store
			.fetch_entity(kind, lookup)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("No {kind} matches {key:?}.") })
	}
}

fn parse_uri(uri: &str) -> Result<ResourceTarget> {
	let unsupported =
		|| Error::InvalidRequest { message: format!("Unsupported resource URI {uri:?}.") };
	let path = uri.strip_prefix(URI_SCHEME).ok_or_else(unsupported)?;
	let (head, tail) = match path.split_once('/') {
		Some((head, tail)) => (head, Some(tail)),
		None => (path, None),
	};

	if head == SEARCH_PATH {
		let raw = tail.ok_or_else(unsupported)?;
		let query = urlencoding::decode(raw).map_err(|err| Error::InvalidRequest {
			message: format!("Search query is not valid percent-encoded UTF-8: {err}"),
		})?;

		return Ok(ResourceTarget::Search(query.into_owned()));
	}

	let kind = kind_for_path(head).ok_or_else(unsupported)?;

	match tail {
		None | Some("") => Ok(ResourceTarget::Collection(kind)),
		Some(_) if kind == EntityKind::RequirementType => Err(unsupported()),
		Some(key) if key.contains('/') => Err(unsupported()),
		Some(key) => Ok(ResourceTarget::Entity { kind, key: key.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	use super::{ResourceTarget, parse_uri};
	use rqm_domain::EntityKind;

	#[test]
	fn collection_and_entity_uris_parse() {
		assert_eq!(
			parse_uri("requirements://user-stories").expect("uri"),
			ResourceTarget::Collection(EntityKind::UserStory)
		);
		assert_eq!(
			parse_uri("requirements://requirements-types").expect("uri"),
			ResourceTarget::Collection(EntityKind::RequirementType)
		);
		assert_eq!(
			parse_uri("requirements://epics/EP-001").expect("uri"),
			ResourceTarget::Entity { kind: EntityKind::Epic, key: "EP-001".to_string() }
		);
	}

	#[test]
	fn search_uri_is_percent_decoded() {
		assert_eq!(
			parse_uri("requirements://search/api%20gateway").expect("uri"),
			ResourceTarget::Search("api gateway".to_string())
		);
	}

	#[test]
	fn unknown_uris_are_rejected() {
		for uri in [
			"https://epics",
			"requirements://acceptance-criteria",
			"requirements://requirements-types/x",
			"requirements://epics/a/b",
			"requirements://search",
		] {
			assert!(parse_uri(uri).is_err(), "{uri}");
		}
	}
}
