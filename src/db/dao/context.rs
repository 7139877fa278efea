use sea_orm::DatabaseConnection;

use super::{AdminDao, DaoBase, GameConfigDao, OverrideDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn admin(&self) -> AdminDao {
        DaoBase::new(&self.db)
    }

    pub fn room_override(&self) -> OverrideDao {
        DaoBase::new(&self.db)
    }

    pub fn game_config(&self) -> GameConfigDao {
        DaoBase::new(&self.db)
    }
}
