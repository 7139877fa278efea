pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_URL: &str = "sqlite://entitlement.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_IDLE: u32 = 1;
pub const DEFAULT_SUPERADMIN_ID: &str = "super";
pub const DEFAULT_SUPERADMIN_PASSWORD: &str = "super123";
pub const DEFAULT_ADMIN_ID: &str = "admin1";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_USER_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;
pub const DEFAULT_CORS_ALLOW_ORIGINS: &str = "*";
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86_400;
