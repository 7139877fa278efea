use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{DaoBase, DaoLayerError, DaoResult, TimestampedActiveModel};
use crate::db::entities::{prelude::RoomOverride, room_override};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverrideKey {
    pub vendor: String,
    pub game_id: String,
    pub room_no: i64,
}

impl OverrideKey {
    fn as_tuple(&self) -> (String, String, i64) {
        (self.vendor.clone(), self.game_id.clone(), self.room_no)
    }
}

#[derive(Clone)]
pub struct OverrideDao {
    db: DatabaseConnection,
}

impl DaoBase for OverrideDao {
    type Entity = RoomOverride;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl OverrideDao {
    /// Only returns the row while `now_ms < expire_at`.
    pub async fn find_live(
        &self,
        key: &OverrideKey,
        now_ms: i64,
    ) -> DaoResult<Option<room_override::Model>> {
        let row = self.find_by_key(key.as_tuple()).await?;
        Ok(row.filter(|row| row.expire_at > now_ms))
    }

    pub async fn list_live(&self, now_ms: i64) -> DaoResult<Vec<room_override::Model>> {
        self.list(move |query| {
            query
                .filter(room_override::Column::ExpireAt.gt(now_ms))
                .order_by_asc(room_override::Column::Vendor)
                .order_by_asc(room_override::Column::GameId)
                .order_by_asc(room_override::Column::RoomNo)
        })
        .await
    }

    /// Insert or overwrite; `created_at` survives an overwrite.
    pub async fn upsert(
        &self,
        key: &OverrideKey,
        rate: i64,
        expire_at: i64,
        now_ms: i64,
    ) -> DaoResult<()> {
        let mut active = room_override::ActiveModel {
            vendor: Set(key.vendor.clone()),
            game_id: Set(key.game_id.clone()),
            room_no: Set(key.room_no),
            rate: Set(rate),
            expire_at: Set(expire_at),
            ..Default::default()
        };
        active.set_created_at(now_ms);
        active.set_updated_at(now_ms);

        RoomOverride::insert(active)
            .on_conflict(
                OnConflict::columns([
                    room_override::Column::Vendor,
                    room_override::Column::GameId,
                    room_override::Column::RoomNo,
                ])
                .update_columns([
                    room_override::Column::Rate,
                    room_override::Column::ExpireAt,
                    room_override::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(())
    }

    /// Deletes every row with `expire_at <= now_ms`; returns how many went.
    pub async fn sweep_expired(&self, now_ms: i64) -> DaoResult<u64> {
        let result = RoomOverride::delete_many()
            .filter(room_override::Column::ExpireAt.lte(now_ms))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
