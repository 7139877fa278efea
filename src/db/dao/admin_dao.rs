use sea_orm::{DatabaseConnection, QueryOrder, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{admin, prelude::Admin};

#[derive(Clone)]
pub struct AdminDao {
    db: DatabaseConnection,
}

impl DaoBase for AdminDao {
    type Entity = Admin;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AdminDao {
    pub async fn find(&self, id: &str) -> DaoResult<Option<admin::Model>> {
        self.find_by_key(id.to_string()).await
    }

    /// Superadmins first, then by id.
    pub async fn list_ordered(&self) -> DaoResult<Vec<admin::Model>> {
        self.list(|query| {
            query
                .order_by_desc(admin::Column::Role)
                .order_by_asc(admin::Column::Id)
        })
        .await
    }

    pub async fn insert(
        &self,
        id: &str,
        password_hash: String,
        name: String,
        role: &str,
        now_ms: i64,
    ) -> DaoResult<admin::Model> {
        let model = admin::ActiveModel {
            id: Set(id.to_string()),
            password_hash: Set(password_hash),
            name: Set(name),
            role: Set(role.to_string()),
            ..Default::default()
        };
        self.create(model, now_ms).await
    }

    pub async fn overwrite(
        &self,
        id: &str,
        password_hash: Option<String>,
        name: String,
        role: &str,
        now_ms: i64,
    ) -> DaoResult<admin::Model> {
        let role = role.to_string();
        self.update(id.to_string(), now_ms, move |active| {
            if let Some(hash) = password_hash {
                active.password_hash = Set(hash);
            }
            active.name = Set(name);
            active.role = Set(role);
        })
        .await
    }

    pub async fn remove(&self, id: &str) -> DaoResult<bool> {
        self.delete(id.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::AdminDao;
    use crate::db::dao::DaoBase;
    use crate::db::entities::admin;

    fn admin_model(id: &str, role: &str) -> admin::Model {
        admin::Model {
            id: id.to_string(),
            password_hash: "hash".to_string(),
            name: id.to_string(),
            role: role.to_string(),
            created_at: 1,
            updated_at: 1,
        }
    }

    #[tokio::test]
    async fn list_ordered_passes_rows_through() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                admin_model("super", "superadmin"),
                admin_model("admin1", "admin"),
            ]])
            .into_connection();
        let dao = AdminDao::new(&db);

        let admins = dao.list_ordered().await.expect("query should succeed");
        let ids: Vec<_> = admins.iter().map(|admin| admin.id.as_str()).collect();
        assert_eq!(ids, vec!["super", "admin1"]);
    }

    #[tokio::test]
    async fn remove_reports_missing_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = AdminDao::new(&db);

        assert!(!dao.remove("ghost").await.expect("delete should run"));
    }
}
