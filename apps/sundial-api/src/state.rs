use std::sync::Arc;

use sundial_service::SundialService;
use sundial_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SundialService>,
}
impl AppState {
	pub async fn new(config: sundial_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = SundialService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
