use sea_orm::{DbErr, EntityTrait};

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (key={key})")]
    NotFound { entity: &'static str, key: String },
}

impl DaoLayerError {
    pub fn not_found<E: EntityTrait>(key: &impl std::fmt::Debug) -> Self {
        Self::NotFound {
            entity: E::default().table_name(),
            key: format!("{key:?}"),
        }
    }
}

pub type DaoResult<T> = Result<T, DaoLayerError>;
