use std::{sync::Arc, time::Duration};

use rqm_service::RqmService;
use rqm_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RqmService>,
	pub request_timeout: Duration,
}
impl AppState {
	/// Connects to Postgres, applies the schema and wires the default stores.
	pub async fn new(config: rqm_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(RqmService::new(config, db)?))
	}

	pub fn from_service(service: RqmService) -> Self {
		let request_timeout = Duration::from_millis(service.cfg.service.request_timeout_ms);

		Self { service: Arc::new(service), request_timeout }
	}
}
