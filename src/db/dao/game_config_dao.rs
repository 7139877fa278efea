use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{game_config, prelude::GameConfig};

#[derive(Clone)]
pub struct GameConfigDao {
    db: DatabaseConnection,
}

impl DaoBase for GameConfigDao {
    type Entity = GameConfig;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl GameConfigDao {
    pub async fn find(&self, vendor: &str, game_id: &str) -> DaoResult<Option<game_config::Model>> {
        self.find_by_key((vendor.to_string(), game_id.to_string()))
            .await
    }

    pub async fn list_all(&self) -> DaoResult<Vec<game_config::Model>> {
        self.list(|query| {
            query
                .order_by_asc(game_config::Column::Vendor)
                .order_by_asc(game_config::Column::GameId)
        })
        .await
    }

    pub async fn upsert(
        &self,
        vendor: &str,
        game_id: &str,
        pages: i64,
        total_rooms: i64,
        now_ms: i64,
    ) -> DaoResult<()> {
        let active = game_config::ActiveModel {
            vendor: Set(vendor.to_string()),
            game_id: Set(game_id.to_string()),
            pages: Set(pages),
            total_rooms: Set(total_rooms),
            created_at: Set(now_ms),
            updated_at: Set(now_ms),
            ..Default::default()
        };

        GameConfig::insert(active)
            .on_conflict(
                OnConflict::columns([game_config::Column::Vendor, game_config::Column::GameId])
                    .update_columns([
                        game_config::Column::Pages,
                        game_config::Column::TotalRooms,
                        game_config::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(())
    }
}
