use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::id_generator::IdGenerator;
use crate::store::{self, DatabaseInterface};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseInterface>,
    pub ids: Arc<IdGenerator>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = store::connect(&config.database.url).await?;
        Ok(Self {
            db,
            ids: Arc::new(IdGenerator::new(0)),
            config,
        })
    }
}
