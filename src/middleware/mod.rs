mod cors;
mod guards;
mod json_error;
mod panic;

pub use cors::{cors_layer, preflight_middleware};
pub use guards::{AdminGuard, AuthGuard, SuperAdminGuard, UserGuard};
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
