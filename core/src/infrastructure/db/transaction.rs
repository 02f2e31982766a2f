use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::error;

use crate::{
    domain::cluster::{entities::ClusterError, ports::TransactionManager},
    infrastructure::db::map_db_error,
};

/// Hands out sea-orm transactions. A `DatabaseTransaction` dropped without
/// commit is rolled back by sea-orm itself.
#[derive(Debug, Clone)]
pub struct PostgresTransactionManager {
    pub db: DatabaseConnection,
}

impl PostgresTransactionManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TransactionManager for PostgresTransactionManager {
    type Transaction = DatabaseTransaction;

    async fn begin(&self) -> Result<DatabaseTransaction, ClusterError> {
        self.db.begin().await.map_err(|e| {
            error!("Failed to begin transaction: {}", e);
            map_db_error("transaction", e)
        })
    }

    async fn commit(&self, tx: DatabaseTransaction) -> Result<(), ClusterError> {
        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            map_db_error("transaction", e)
        })
    }

    async fn rollback(&self, tx: DatabaseTransaction) -> Result<(), ClusterError> {
        tx.rollback()
            .await
            .map_err(|e| map_db_error("transaction", e))
    }
}
