pub mod bootstrap;
pub mod gate;
pub mod jwt;
pub mod password;
mod types;

pub use jwt::TokenService;
pub use types::{
    AdminRole, Claims, Principal, PrincipalKind, RequiredRole, Role, SuperAdminRole, UserRole,
};
