use crate::{Error, Result, RqmService, search::SearchResult, search::retrieval};
use rqm_domain::{EntityKind, reference};

impl RqmService {
	/// Looks up a reference id such as `us-12`, ignoring case and surrounding whitespace.
	pub async fn resolve_reference(&self, reference_id: &str) -> Result<SearchResult> {
		let pattern = reference::detect(reference_id);
		let (Some(kind), Some(canonical)) = (pattern.entity_type, pattern.canonical()) else {
			return Err(Error::InvalidRequest {
				message: format!("{reference_id:?} is not a reference id."),
			});
		};

		// Steering documents have no table to search.
		if kind == EntityKind::SteeringDocument {
			return Err(Error::NotFound {
				message: format!("No entity has reference id {canonical}."),
			});
		}

		let row = self.store.find_by_reference(kind, &canonical).await?.ok_or_else(|| {
			Error::NotFound { message: format!("No entity has reference id {canonical}.") }
		})?;

		Ok(retrieval::to_result(kind, row))
	}
}
