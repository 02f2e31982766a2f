use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        cluster::{
            entities::{Cluster, ClusterError},
            ports::ClusterRepository,
            value_objects::{CreateClusterRecordRequest, Page, PageRequest},
        },
        common::generate_timestamp,
    },
    entity::clusters::{
        ActiveModel as ClusterActiveModel, Column as ClusterColumn, Entity as ClusterEntity,
    },
    infrastructure::db::map_db_error,
};

const RESOURCE: &str = "cluster";

#[derive(Debug, Clone)]
pub struct PostgresClusterRepository {
    pub db: DatabaseConnection,
}

impl PostgresClusterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ClusterRepository<DatabaseTransaction> for PostgresClusterRepository {
    async fn get(&self, id: Uuid) -> Result<Cluster, ClusterError> {
        ClusterEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .map(Cluster::from)
            .ok_or_else(|| ClusterError::not_found(RESOURCE, id))
    }

    async fn get_by_name(&self, name: &str) -> Result<Cluster, ClusterError> {
        ClusterEntity::find()
            .filter(ClusterColumn::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .map(Cluster::from)
            .ok_or_else(|| ClusterError::not_found(RESOURCE, name))
    }

    async fn save(
        &self,
        tx: &DatabaseTransaction,
        request: CreateClusterRecordRequest,
    ) -> Result<Cluster, ClusterError> {
        let (now, timestamp) = generate_timestamp();

        let model = ClusterActiveModel {
            id: Set(Uuid::new_v7(timestamp)),
            name: Set(request.name),
            spec_id: Set(request.spec_id),
            status_id: Set(request.status_id),
            secret_id: Set(request.secret_id),
            created_at: Set(now.naive_utc()),
            updated_at: Set(now.naive_utc()),
        }
        .insert(tx)
        .await
        .map_err(|e| {
            error!("Failed to save cluster: {}", e);
            map_db_error(RESOURCE, e)
        })?;

        Ok(Cluster::from(model))
    }

    async fn list(&self) -> Result<Vec<Cluster>, ClusterError> {
        let clusters = ClusterEntity::find()
            .order_by_asc(ClusterColumn::CreatedAt)
            .order_by_asc(ClusterColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .into_iter()
            .map(Cluster::from)
            .collect();

        Ok(clusters)
    }

    async fn page(&self, page: PageRequest) -> Result<Page<Cluster>, ClusterError> {
        page.validate()?;

        let paginator = ClusterEntity::find()
            .order_by_asc(ClusterColumn::CreatedAt)
            .order_by_asc(ClusterColumn::Id)
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
            .map(Cluster::from)
            .collect();

        Ok(Page { total, items })
    }

    async fn delete(&self, tx: &DatabaseTransaction, id: Uuid) -> Result<(), ClusterError> {
        let result = ClusterEntity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?;

        if result.rows_affected == 0 {
            return Err(ClusterError::not_found(RESOURCE, id));
        }

        Ok(())
    }
}
