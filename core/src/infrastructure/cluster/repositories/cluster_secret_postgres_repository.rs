use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryOrder,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        cluster::{
            entities::{BootstrapToken, ClusterError, ClusterSecret},
            ports::ClusterSecretRepository,
            value_objects::{Page, PageRequest},
        },
        common::generate_timestamp,
    },
    entity::cluster_secrets::{
        ActiveModel as ClusterSecretActiveModel, Column as ClusterSecretColumn,
        Entity as ClusterSecretEntity,
    },
    infrastructure::db::map_db_error,
};

const RESOURCE: &str = "cluster secret";

#[derive(Debug, Clone)]
pub struct PostgresClusterSecretRepository {
    pub db: DatabaseConnection,
}

impl PostgresClusterSecretRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ClusterSecretRepository<DatabaseTransaction> for PostgresClusterSecretRepository {
    async fn get(&self, id: Uuid) -> Result<ClusterSecret, ClusterError> {
        ClusterSecretEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .map(ClusterSecret::from)
            .ok_or_else(|| ClusterError::not_found(RESOURCE, id))
    }

    async fn save(
        &self,
        tx: &DatabaseTransaction,
        token: BootstrapToken,
    ) -> Result<ClusterSecret, ClusterError> {
        let (now, timestamp) = generate_timestamp();

        let model = ClusterSecretActiveModel {
            id: Set(Uuid::new_v7(timestamp)),
            kubeadm_token: Set(token.as_str().to_string()),
            created_at: Set(now.naive_utc()),
            updated_at: Set(now.naive_utc()),
        }
        .insert(tx)
        .await
        .map_err(|e| {
            error!("Failed to save secret for token {}", token.token_id());
            map_db_error(RESOURCE, e)
        })?;

        Ok(ClusterSecret::from(model))
    }

    async fn list(&self) -> Result<Vec<ClusterSecret>, ClusterError> {
        let secrets = ClusterSecretEntity::find()
            .order_by_asc(ClusterSecretColumn::CreatedAt)
            .order_by_asc(ClusterSecretColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .into_iter()
            .map(ClusterSecret::from)
            .collect();

        Ok(secrets)
    }

    async fn page(&self, page: PageRequest) -> Result<Page<ClusterSecret>, ClusterError> {
        page.validate()?;

        let paginator = ClusterSecretEntity::find()
            .order_by_asc(ClusterSecretColumn::CreatedAt)
            .order_by_asc(ClusterSecretColumn::Id)
            .paginate(&self.db, page.size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?;
        let items = paginator
            .fetch_page(page.index())
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .into_iter()
            .map(ClusterSecret::from)
            .collect();

        Ok(Page { total, items })
    }

    async fn delete(&self, tx: &DatabaseTransaction, id: Uuid) -> Result<(), ClusterError> {
        let result = ClusterSecretEntity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?;

        if result.rows_affected == 0 {
            return Err(ClusterError::not_found(RESOURCE, id));
        }

        Ok(())
    }
}
