use std::sync::Arc;

use crate::{
	BoxFuture, Error, Result,
	catalog::{
		ResourceDescriptor, ResourceProvider, SEARCH_PATH, URI_SCHEME, collection_path,
		collection_uri,
	},
	store::SearchStore,
};
use rqm_domain::EntityKind;

/// Lists one entity table as resources.
///
/// Epics, user stories and requirements yield a descriptor per row (oldest first, up to
/// `max_entities`) followed by the collection descriptor. Requirement types yield only the
/// collection.
pub struct EntityProvider {
	kind: EntityKind,
	path: &'static str,
	name: String,
	store: Arc<dyn SearchStore>,
	max_entities: u32,
}
impl EntityProvider {
	pub fn new(kind: EntityKind, store: Arc<dyn SearchStore>, max_entities: u32) -> Result<Self> {
		let path = collection_path(kind).ok_or_else(|| Error::InvalidRequest {
			message: format!("{kind} is not exposed as a resource."),
		})?;

		Ok(Self { kind, path, name: format!("{path}-provider"), store, max_entities })
	}

	fn collection_descriptor(&self) -> ResourceDescriptor {
		let label = self.kind.label();

		ResourceDescriptor::json(
			collection_uri(self.path),
			format!("{label} collection"),
			Some(format!("Every {} resource.", label.to_lowercase())),
		)
	}

	async fn list(&self) -> Result<Vec<ResourceDescriptor>> {
		if self.kind == EntityKind::RequirementType {
			return Ok(vec![self.collection_descriptor()]);
		}

		let entries = self.store.list_catalog(self.kind, self.max_entities).await?;
		let mut descriptors = Vec::with_capacity(entries.len() + 1);

		for entry in entries {
			let name = entry.reference_id.clone().unwrap_or_else(|| entry.title.clone());

			descriptors.push(ResourceDescriptor::json(
				format!("{URI_SCHEME}{}/{}", self.path, entry.id),
				name,
				Some(entry.title),
			));
		}

		descriptors.push(self.collection_descriptor());

		Ok(descriptors)
	}
}
impl ResourceProvider for EntityProvider {
	fn name(&self) -> &str {
		&self.name
	}

	fn list_descriptors(&self) -> BoxFuture<'_, Result<Vec<ResourceDescriptor>>> {
		Box::pin(self.list())
	}
}

/// Advertises the parameterized search resource.
pub struct SearchTemplateProvider;
impl ResourceProvider for SearchTemplateProvider {
	fn name(&self) -> &str {
		"search-template-provider"
	}

	fn list_descriptors(&self) -> BoxFuture<'_, Result<Vec<ResourceDescriptor>>> {
		Box::pin(async {
			Ok(vec![ResourceDescriptor::json(
				format!("{URI_SCHEME}{SEARCH_PATH}/{{query}}"),
				"Search".to_string(),
				Some(
					"Cross-entity search. Replace {query} with percent-encoded search text."
						.to_string(),
				),
			)])
		})
	}
}
