#[allow(unused_imports)]
pub mod prelude {
    pub use super::admin::Entity as Admin;
    pub use super::game_config::Entity as GameConfig;
    pub use super::room_override::Entity as RoomOverride;
    pub use super::user::Entity as User;
}

pub mod admin;
pub mod game_config;
pub mod room_override;
pub mod user;
