use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryOrder,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        cluster::{
            entities::{ClusterError, ClusterSpec},
            ports::ClusterSpecRepository,
            value_objects::{CreateClusterSpecRequest, Page, PageRequest},
        },
        common::generate_timestamp,
    },
    entity::cluster_specs::{
        ActiveModel as ClusterSpecActiveModel, Column as ClusterSpecColumn,
        Entity as ClusterSpecEntity,
    },
    infrastructure::db::map_db_error,
};

const RESOURCE: &str = "cluster spec";

#[derive(Debug, Clone)]
pub struct PostgresClusterSpecRepository {
    pub db: DatabaseConnection,
}

impl PostgresClusterSpecRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ClusterSpecRepository<DatabaseTransaction> for PostgresClusterSpecRepository {
    async fn get(&self, id: Uuid) -> Result<ClusterSpec, ClusterError> {
        ClusterSpecEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .map(ClusterSpec::from)
            .ok_or_else(|| ClusterError::not_found(RESOURCE, id))
    }

    async fn save(
        &self,
        tx: &DatabaseTransaction,
        request: CreateClusterSpecRequest,
    ) -> Result<ClusterSpec, ClusterError> {
        let (now, timestamp) = generate_timestamp();

        let model = ClusterSpecActiveModel {
            id: Set(Uuid::new_v7(timestamp)),
            runtime_type: Set(request.runtime_type),
            docker_storage_dir: Set(request.docker_storage_dir),
            containerd_storage_dir: Set(request.containerd_storage_dir),
            network_type: Set(request.network_type),
            cluster_cidr: Set(request.cluster_cidr),
            service_cidr: Set(request.service_cidr),
            version: Set(request.version),
            app_domain: Set(request.app_domain),
            created_at: Set(now.naive_utc()),
            updated_at: Set(now.naive_utc()),
        }
        .insert(tx)
        .await
        .map_err(|e| {
            error!("Failed to save cluster spec: {}", e);
            map_db_error(RESOURCE, e)
        })?;

        Ok(ClusterSpec::from(model))
    }

    async fn list(&self) -> Result<Vec<ClusterSpec>, ClusterError> {
        let specs = ClusterSpecEntity::find()
            .order_by_asc(ClusterSpecColumn::CreatedAt)
            .order_by_asc(ClusterSpecColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?
            .into_iter()
            .map(ClusterSpec::from)
            .collect();

        Ok(specs)
    }

    async fn page(&self, page: PageRequest) -> Result<Page<ClusterSpec>, ClusterError> {
        page.validate()?;

        let paginator = ClusterSpecEntity::find()
            .order_by_asc(ClusterSpecColumn::CreatedAt)
            .order_by_asc(ClusterSpecColumn::Id)
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
            .map(ClusterSpec::from)
            .collect();

        Ok(Page { total, items })
    }

    async fn delete(&self, tx: &DatabaseTransaction, id: Uuid) -> Result<(), ClusterError> {
        let result = ClusterSpecEntity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(|e| map_db_error(RESOURCE, e))?;

        if result.rows_affected == 0 {
            return Err(ClusterError::not_found(RESOURCE, id));
        }

        Ok(())
    }
}
