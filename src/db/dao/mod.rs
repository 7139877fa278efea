pub mod admin_dao;
pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod game_config_dao;
pub mod override_dao;
pub mod user_dao;

pub use admin_dao::AdminDao;
pub use base::{DaoBase, KeyOf, ModelOf};
pub use base_traits::{HasUpdatedAtColumn, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use game_config_dao::GameConfigDao;
pub use override_dao::{OverrideDao, OverrideKey};
pub use user_dao::{NewUser, UserDao, UserPatch};
