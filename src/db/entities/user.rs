use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub uses_left: i64,
    pub unlimited: bool,
    pub disabled: bool,
    /// Epoch ms; 0 when no cycle has been started.
    pub cycle_end_at: i64,
    #[sea_orm(indexed)]
    pub created_by_admin_id: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
