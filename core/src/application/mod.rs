use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    domain::{
        cluster::entities::ClusterError,
        common::{KubeopsConfig, services::Service},
    },
    infrastructure::{
        cluster::repositories::{
            cluster_postgres_repository::PostgresClusterRepository,
            cluster_secret_postgres_repository::PostgresClusterSecretRepository,
            cluster_spec_postgres_repository::PostgresClusterSpecRepository,
            cluster_status_postgres_repository::PostgresClusterStatusRepository,
        },
        db::{
            postgres::{Postgres, PostgresConfig},
            schema::ensure_schema,
            transaction::PostgresTransactionManager,
        },
        repositories::random_bytes_bootstrap_token::RandBytesBootstrapTokenRepository,
    },
};

pub type KubeopsService = Service<
    PostgresTransactionManager,
    PostgresClusterRepository,
    PostgresClusterSpecRepository,
    PostgresClusterStatusRepository,
    PostgresClusterSecretRepository,
    RandBytesBootstrapTokenRepository,
>;

pub async fn create_service(config: KubeopsConfig) -> Result<KubeopsService, ClusterError> {
    let postgres = Postgres::new(PostgresConfig {
        database_url: config.database.database_url(),
    })
    .await
    .map_err(|e| ClusterError::ServiceUnavailable(e.to_string()))?;

    ensure_schema(&postgres.get_db())
        .await
        .map_err(|e| ClusterError::Storage(e.to_string()))?;
    info!("cluster schema initialized");

    Ok(create_service_with_connection(postgres.get_db()))
}

/// Wires the service on top of an already open connection.
pub fn create_service_with_connection(db: DatabaseConnection) -> KubeopsService {
    Service::new(
        PostgresTransactionManager::new(db.clone()),
        PostgresClusterRepository::new(db.clone()),
        PostgresClusterSpecRepository::new(db.clone()),
        PostgresClusterStatusRepository::new(db.clone()),
        PostgresClusterSecretRepository::new(db),
        RandBytesBootstrapTokenRepository::new(),
    )
}
