use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryOrder,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        cluster::{
            entities::{ClusterError, ClusterPhase, ClusterStatus},
            ports::ClusterStatusRepository,
            value_objects::{Page, PageRequest},
        },
        common::generate_timestamp,
    },
    entity::cluster_statuses::{
        ActiveModel as ClusterStatusActiveModel, Column as ClusterStatusColumn,
        Entity as ClusterStatusEntity,
    },
    infrastructure::db::map_db_error,
};

const RESOURCE: &str = "cluster status";

#[derive(Debug, Clone)]
pub struct PostgresClusterStatusRepository {
    pub db: DatabaseConnection,
}

impl PostgresClusterStatusRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ClusterStatusRepository<DatabaseTransaction> for PostgresClusterStatusRepository {
    async fn get(&self, id: Uuid) -> Result<ClusterStatus, ClusterError> {
        ClusterStatusEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .ok_or_else(|| ClusterError::not_found(RESOURCE, id))?
            .try_into()
    }

    async fn save(
        &self,
        tx: &DatabaseTransaction,
        phase: ClusterPhase,
    ) -> Result<ClusterStatus, ClusterError> {
        let (now, timestamp) = generate_timestamp();

        let model = ClusterStatusActiveModel {
            id: Set(Uuid::new_v7(timestamp)),
            phase: Set(phase.to_string()),
            message: Set(None),
            created_at: Set(now.naive_utc()),
            updated_at: Set(now.naive_utc()),
        }
        .insert(tx)
        .await
        .map_err(|e| {
            error!("Failed to save cluster status: {}", e);
            map_db_error(RESOURCE, e)
        })?;

        ClusterStatus::try_from(model)
    }

    async fn list(&self) -> Result<Vec<ClusterStatus>, ClusterError> {
        ClusterStatusEntity::find()
            .order_by_asc(ClusterStatusColumn::CreatedAt)
            .order_by_asc(ClusterStatusColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .into_iter()
            .map(ClusterStatus::try_from)
            .collect()
    }

    async fn page(&self, page: PageRequest) -> Result<Page<ClusterStatus>, ClusterError> {
        page.validate()?;

        let paginator = ClusterStatusEntity::find()
            .order_by_asc(ClusterStatusColumn::CreatedAt)
            .order_by_asc(ClusterStatusColumn::Id)
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
            .map(ClusterStatus::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page { total, items })
    }

    async fn delete(&self, tx: &DatabaseTransaction, id: Uuid) -> Result<(), ClusterError> {
        let result = ClusterStatusEntity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?;

        if result.rows_affected == 0 {
            return Err(ClusterError::not_found(RESOURCE, id));
        }

        Ok(())
    }
}
