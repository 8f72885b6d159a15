use std::sync::{Arc, RwLock};

use crate::{
	Error,
	catalog::{ResourceDescriptor, ResourceProvider},
};

/// Insertion-ordered set of providers behind one lock.
///
/// The lock only guards the provider list; it is released before any provider is called.
#[derive(Default)]
pub struct ResourceRegistry {
	providers: RwLock<Vec<Arc<dyn ResourceProvider>>>,
}
impl ResourceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&self, provider: Arc<dyn ResourceProvider>) {
		self.providers.write().unwrap_or_else(|err| err.into_inner()).push(provider);
	}

	pub fn len(&self) -> usize {
		self.providers.read().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Collects descriptors from every provider, sorted by URI with duplicates removed.
	///
	/// A failing provider is logged and contributes nothing.
	pub async fn get_all(&self) -> Vec<ResourceDescriptor> {
		let providers = self.providers.read().unwrap_or_else(|err| err.into_inner()).clone();
		let mut descriptors = Vec::new();

		for provider in providers {
			match provider.list_descriptors().await {
				Ok(listed) => descriptors.extend(listed),
				Err(err) => {
					let err = Error::ProviderFailed {
						name: provider.name().to_string(),
						message: err.to_string(),
					};

					tracing::warn!(
						error = %err,
						provider = provider.name(),
						"Skipping resource provider."
					);
				},
			}
		}

		descriptors.sort_by(|a, b| a.uri.cmp(&b.uri));
		descriptors.dedup_by(|a, b| a.uri == b.uri);

		descriptors
	}
}
