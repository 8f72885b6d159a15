pub mod catalog;
pub mod references;
pub mod resources;
pub mod search;
pub mod store;
pub mod time_serde;

mod error;

pub use catalog::{ResourceDescriptor, ResourceProvider, ResourceRegistry};
pub use error::{Error, Result};
pub use resources::ResourceContent;
pub use search::{SearchFilters, SearchOptions, SearchResponse, SearchResult, SortBy, SortOrder};
pub use store::{CacheStore, EntityLookup, PgCacheStore, PgSearchStore, SearchStore};

use std::{future::Future, pin::Pin, sync::Arc};

use catalog::{EntityProvider, SearchTemplateProvider};
use rqm_config::Config;
use rqm_domain::EntityKind;
use rqm_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub struct RqmService {
	pub cfg: Config,
	pub store: Arc<dyn SearchStore>,
	pub cache: Option<Arc<dyn CacheStore>>,
	pub registry: ResourceRegistry,
}
impl RqmService {
	/// Wires the Postgres-backed stores and the default providers.
	pub fn new(cfg: Config, db: Db) -> Result<Self> {
		let store: Arc<dyn SearchStore> = Arc::new(PgSearchStore::new(db.clone()));
		let cache: Option<Arc<dyn CacheStore>> = cfg
			.search
			.cache
			.enabled
			.then(|| Arc::new(PgCacheStore::new(db)) as Arc<dyn CacheStore>);

		Self::with_stores(cfg, store, cache)
	}

	pub fn with_stores(
		cfg: Config,
		store: Arc<dyn SearchStore>,
		cache: Option<Arc<dyn CacheStore>>,
	) -> Result<Self> {
		let registry = default_registry(&store, cfg.catalog.max_entities_per_provider)?;

		Ok(Self { cfg, store, cache, registry })
	}

	pub async fn list_resources(&self) -> Vec<ResourceDescriptor> {
		self.registry.get_all().await
	}
}

/// One provider per exposed entity kind plus the search template.
pub fn default_registry(
	store: &Arc<dyn SearchStore>,
	max_entities: u32,
) -> Result<ResourceRegistry> {
	let registry = ResourceRegistry::new();

	for kind in [
		EntityKind::Epic,
		EntityKind::UserStory,
		EntityKind::Requirement,
		EntityKind::RequirementType,
	] {
		registry.register(Arc::new(EntityProvider::new(kind, store.clone(), max_entities)?));
	}

	registry.register(Arc::new(SearchTemplateProvider));

	Ok(registry)
}
