pub mod admin_service;
pub mod bounds;
pub mod context;
pub mod game_config_service;
pub mod override_service;
pub mod session_service;
pub mod user_service;

pub use context::ServiceContext;
