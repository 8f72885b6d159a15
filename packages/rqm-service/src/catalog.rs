//! Resource catalog: descriptors, pluggable providers and the registry that aggregates them.

pub mod providers;
pub mod registry;

pub use providers::{EntityProvider, SearchTemplateProvider};
pub use registry::ResourceRegistry;

use serde::{Deserialize, Serialize};

use crate::{BoxFuture, Result};
use rqm_domain::EntityKind;

pub const URI_SCHEME: &str = "requirements://";
pub const MIME_JSON: &str = "application/json";
pub const SEARCH_PATH: &str = "search";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
	pub uri: String,
	pub name: String,
	pub description: Option<String>,
	pub mime_type: String,
}
impl ResourceDescriptor {
	pub fn json(uri: String, name: String, description: Option<String>) -> Self {
		Self { uri, name, description, mime_type: MIME_JSON.to_string() }
	}
}

/// One source of catalog entries.
pub trait ResourceProvider
where
	Self: Send + Sync,
{
	fn name(&self) -> &str;

	fn list_descriptors(&self) -> BoxFuture<'_, Result<Vec<ResourceDescriptor>>>;
}

/// URI path segment of a kind's collection. Only kinds exposed as resources have one.
pub fn collection_path(kind: EntityKind) -> Option<&'static str> {
	match kind {
		EntityKind::Epic => Some("epics"),
		EntityKind::UserStory => Some("user-stories"),
		EntityKind::Requirement => Some("requirements"),
		EntityKind::RequirementType => Some("requirements-types"),
		EntityKind::AcceptanceCriteria | EntityKind::SteeringDocument => None,
	}
}

pub fn kind_for_path(path: &str) -> Option<EntityKind> {
	[EntityKind::Epic, EntityKind::UserStory, EntityKind::Requirement, EntityKind::RequirementType]
		.into_iter()
		.find(|kind| collection_path(*kind) == Some(path))
}

pub fn collection_uri(path: &str) -> String {
	format!("{URI_SCHEME}{path}")
}
