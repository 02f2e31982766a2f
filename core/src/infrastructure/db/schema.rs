use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use tracing::debug;

use crate::entity::prelude::{ClusterSecrets, ClusterSpecs, ClusterStatuses, Clusters};

/// Creates the cluster tables when missing. Owned parts come first so the
/// foreign keys on `clusters` have something to point at.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = [
        schema.create_table_from_entity(ClusterSpecs),
        schema.create_table_from_entity(ClusterStatuses),
        schema.create_table_from_entity(ClusterSecrets),
        schema.create_table_from_entity(Clusters),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }
    debug!("cluster schema ready");

    Ok(())
}
