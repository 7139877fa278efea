use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;

use crate::{
    clock::Clock,
    db::{dao::GameConfigDao, entities::game_config},
    error::AppError,
    services::bounds::{clamp_or, non_blank},
};

pub const DEFAULT_PAGES: i64 = 2;
pub const DEFAULT_TOTAL_ROOMS: i64 = 10;
pub const MAX_PAGES: i64 = 50;
pub const MAX_TOTAL_ROOMS: i64 = 99_999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfigView {
    pub vendor: String,
    pub game_id: String,
    pub pages: i64,
    pub total_rooms: i64,
    /// `None` when the defaults are being served.
    pub updated_at: Option<i64>,
}

impl From<game_config::Model> for GameConfigView {
    fn from(model: game_config::Model) -> Self {
        Self {
            vendor: model.vendor,
            game_id: model.game_id,
            pages: model.pages,
            total_rooms: model.total_rooms,
            updated_at: Some(model.updated_at),
        }
    }
}

#[derive(Clone)]
pub struct GameConfigService {
    configs: GameConfigDao,
    clock: Arc<dyn Clock>,
}

impl GameConfigService {
    pub fn new(configs: GameConfigDao, clock: Arc<dyn Clock>) -> Self {
        Self { configs, clock }
    }

    /// Stored config, or the defaults when nothing was saved for the pair.
    pub async fn get(&self, vendor: &str, game_id: &str) -> Result<GameConfigView, AppError> {
        let stored = self.configs.find(vendor, game_id).await?;
        Ok(stored.map(GameConfigView::from).unwrap_or_else(|| GameConfigView {
            vendor: vendor.to_string(),
            game_id: game_id.to_string(),
            pages: DEFAULT_PAGES,
            total_rooms: DEFAULT_TOTAL_ROOMS,
            updated_at: None,
        }))
    }

    pub async fn set(
        &self,
        vendor: Option<&str>,
        game_id: Option<&str>,
        pages: Option<i64>,
        total_rooms: Option<i64>,
    ) -> Result<(), AppError> {
        let (Some(vendor), Some(game_id)) = (non_blank(vendor), non_blank(game_id)) else {
            return Err(AppError::bad_request("vendor and gameId required"));
        };
        let pages = clamp_or(pages, 1, MAX_PAGES, DEFAULT_PAGES);
        let total_rooms = clamp_or(total_rooms, 1, MAX_TOTAL_ROOMS, DEFAULT_TOTAL_ROOMS);

        self.configs
            .upsert(vendor, game_id, pages, total_rooms, self.clock.now_ms())
            .await?;
        tracing::info!(vendor, game_id, pages, total_rooms, "saved game config");
        Ok(())
    }

    /// Keyed `"vendor|gameId"`.
    pub async fn list_all(&self) -> Result<BTreeMap<String, GameConfigView>, AppError> {
        let rows = self.configs.list_all().await?;
        Ok(rows
            .into_iter()
            .map(|row| (format!("{}|{}", row.vendor, row.game_id), row.into()))
            .collect())
    }
}
