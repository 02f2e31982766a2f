use std::sync::Arc;

use crate::domain::cluster::ports::{
    BootstrapTokenRepository, ClusterRepository, ClusterSecretRepository, ClusterSpecRepository,
    ClusterStatusRepository, TransactionManager,
};

#[derive(Clone)]
pub struct Service<TM, C, SP, ST, SE, BT>
where
    TM: TransactionManager,
    C: ClusterRepository<TM::Transaction>,
    SP: ClusterSpecRepository<TM::Transaction>,
    ST: ClusterStatusRepository<TM::Transaction>,
    SE: ClusterSecretRepository<TM::Transaction>,
    BT: BootstrapTokenRepository,
{
    pub(crate) transaction_manager: Arc<TM>,
    pub(crate) cluster_repository: Arc<C>,
    pub(crate) cluster_spec_repository: Arc<SP>,
    pub(crate) cluster_status_repository: Arc<ST>,
    pub(crate) cluster_secret_repository: Arc<SE>,
    pub(crate) bootstrap_token_repository: Arc<BT>,
}

impl<TM, C, SP, ST, SE, BT> Service<TM, C, SP, ST, SE, BT>
where
    TM: TransactionManager,
    C: ClusterRepository<TM::Transaction>,
    SP: ClusterSpecRepository<TM::Transaction>,
    ST: ClusterStatusRepository<TM::Transaction>,
    SE: ClusterSecretRepository<TM::Transaction>,
    BT: BootstrapTokenRepository,
{
    pub fn new(
        transaction_manager: TM,
        cluster_repository: C,
        cluster_spec_repository: SP,
        cluster_status_repository: ST,
        cluster_secret_repository: SE,
        bootstrap_token_repository: BT,
    ) -> Self {
        Service {
            transaction_manager: Arc::new(transaction_manager),
            cluster_repository: Arc::new(cluster_repository),
            cluster_spec_repository: Arc::new(cluster_spec_repository),
            cluster_status_repository: Arc::new(cluster_status_repository),
            cluster_secret_repository: Arc::new(cluster_secret_repository),
            bootstrap_token_repository: Arc::new(bootstrap_token_repository),
        }
    }
}
