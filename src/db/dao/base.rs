use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, PrimaryKeyTrait, QueryOrder, Select,
};

use super::base_traits::{HasUpdatedAtColumn, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

pub type KeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;
pub type ModelOf<E> = <E as EntityTrait>::Model;

/// Shared CRUD over an entity whose active model carries the `base_entity`
/// timestamp columns. Timestamps come from the caller so the service clock
/// stays the only source of time.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + TimestampedActiveModel
        + Send,
    KeyOf<Self::Entity>: Clone + std::fmt::Debug + Send + Sync,
    Self::Entity: HasUpdatedAtColumn,
{
    type Entity: EntityTrait + Send + Sync;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    async fn create(
        &self,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
        now_ms: i64,
    ) -> DaoResult<ModelOf<Self::Entity>> {
        let mut active = data.into_active_model();
        active.set_created_at(now_ms);
        active.set_updated_at(now_ms);
        active.insert(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn find_by_key(&self, key: KeyOf<Self::Entity>) -> DaoResult<Option<ModelOf<Self::Entity>>> {
        Self::Entity::find_by_id(key)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn get_by_key(&self, key: KeyOf<Self::Entity>) -> DaoResult<ModelOf<Self::Entity>> {
        self.find_by_key(key.clone())
            .await?
            .ok_or_else(|| DaoLayerError::not_found::<Self::Entity>(&key))
    }

    /// Every row `apply` lets through, most recently touched first unless
    /// `apply` already imposes an order.
    async fn list(
        &self,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Vec<ModelOf<Self::Entity>>> {
        apply(Self::Entity::find())
            .order_by_desc(Self::Entity::updated_at_column())
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn update<F>(
        &self,
        key: KeyOf<Self::Entity>,
        now_ms: i64,
        apply: F,
    ) -> DaoResult<ModelOf<Self::Entity>>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let model = self.get_by_key(key).await?;

        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(now_ms);

        active.update(self.db()).await.map_err(DaoLayerError::Db)
    }

    /// Returns whether a row was actually removed.
    async fn delete(&self, key: KeyOf<Self::Entity>) -> DaoResult<bool> {
        let result = Self::Entity::delete_by_id(key)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(result.rows_affected > 0)
    }
}
