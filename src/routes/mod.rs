pub mod admin;
mod entry;
pub mod game_config;
pub mod health;
pub mod overrides;
mod params;
pub mod user;
pub mod users;

pub use entry::{app, router};
