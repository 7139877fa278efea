use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "room_overrides")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vendor: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub room_no: i64,
    pub rate: i64,
    #[sea_orm(indexed)]
    pub expire_at: i64,
}

impl ActiveModelBehavior for ActiveModel {}
