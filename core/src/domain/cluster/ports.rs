use uuid::Uuid;

use crate::domain::cluster::{
    entities::{
        BootstrapToken, Cluster, ClusterError, ClusterPhase, ClusterSecret, ClusterSecretView,
        ClusterSpec, ClusterSpecView, ClusterStatus, ClusterStatusView, ClusterView,
    },
    value_objects::{
        CreateClusterRecordRequest, CreateClusterRequest, CreateClusterSpecRequest, Page,
        PageRequest,
    },
};

pub trait ClusterService: Send + Sync {
    /// Persists spec, status, secret and cluster rows in a single transaction.
    fn create_cluster(
        &self,
        request: CreateClusterRequest,
    ) -> impl Future<Output = Result<Cluster, ClusterError>> + Send;
    fn get_cluster(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<ClusterView, ClusterError>> + Send;
    fn get_cluster_spec(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<ClusterSpecView, ClusterError>> + Send;
    fn get_cluster_status(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<ClusterStatusView, ClusterError>> + Send;
    /// The only read that exposes the bootstrap token.
    fn get_cluster_secret(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<ClusterSecretView, ClusterError>> + Send;
    fn list_clusters(&self) -> impl Future<Output = Result<Vec<ClusterView>, ClusterError>> + Send;
    fn page_clusters(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ClusterView>, ClusterError>> + Send;
    fn delete_cluster(&self, name: &str) -> impl Future<Output = Result<(), ClusterError>> + Send;
}

/// Opens and closes the storage transaction that repository writes run in.
#[cfg_attr(test, mockall::automock(type Transaction = ();))]
pub trait TransactionManager: Send + Sync {
    type Transaction: Send + Sync + 'static;

    fn begin(&self) -> impl Future<Output = Result<Self::Transaction, ClusterError>> + Send;
    fn commit(
        &self,
        tx: Self::Transaction,
    ) -> impl Future<Output = Result<(), ClusterError>> + Send;
    fn rollback(
        &self,
        tx: Self::Transaction,
    ) -> impl Future<Output = Result<(), ClusterError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClusterRepository<Tx: Send + Sync + 'static>: Send + Sync {
    fn get(&self, id: Uuid) -> impl Future<Output = Result<Cluster, ClusterError>> + Send;
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Cluster, ClusterError>> + Send;
    fn save(
        &self,
        tx: &Tx,
        request: CreateClusterRecordRequest,
    ) -> impl Future<Output = Result<Cluster, ClusterError>> + Send;
    fn list(&self) -> impl Future<Output = Result<Vec<Cluster>, ClusterError>> + Send;
    fn page(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Cluster>, ClusterError>> + Send;
    fn delete(&self, tx: &Tx, id: Uuid) -> impl Future<Output = Result<(), ClusterError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClusterSpecRepository<Tx: Send + Sync + 'static>: Send + Sync {
    fn get(&self, id: Uuid) -> impl Future<Output = Result<ClusterSpec, ClusterError>> + Send;
    fn save(
        &self,
        tx: &Tx,
        request: CreateClusterSpecRequest,
    ) -> impl Future<Output = Result<ClusterSpec, ClusterError>> + Send;
    fn list(&self) -> impl Future<Output = Result<Vec<ClusterSpec>, ClusterError>> + Send;
    fn page(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ClusterSpec>, ClusterError>> + Send;
    fn delete(&self, tx: &Tx, id: Uuid) -> impl Future<Output = Result<(), ClusterError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClusterStatusRepository<Tx: Send + Sync + 'static>: Send + Sync {
    fn get(&self, id: Uuid) -> impl Future<Output = Result<ClusterStatus, ClusterError>> + Send;
    fn save(
        &self,
        tx: &Tx,
        phase: ClusterPhase,
    ) -> impl Future<Output = Result<ClusterStatus, ClusterError>> + Send;
    fn list(&self) -> impl Future<Output = Result<Vec<ClusterStatus>, ClusterError>> + Send;
    fn page(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ClusterStatus>, ClusterError>> + Send;
    fn delete(&self, tx: &Tx, id: Uuid) -> impl Future<Output = Result<(), ClusterError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClusterSecretRepository<Tx: Send + Sync + 'static>: Send + Sync {
    fn get(&self, id: Uuid) -> impl Future<Output = Result<ClusterSecret, ClusterError>> + Send;
    fn save(
        &self,
        tx: &Tx,
        token: BootstrapToken,
    ) -> impl Future<Output = Result<ClusterSecret, ClusterError>> + Send;
    fn list(&self) -> impl Future<Output = Result<Vec<ClusterSecret>, ClusterError>> + Send;
    fn page(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ClusterSecret>, ClusterError>> + Send;
    fn delete(&self, tx: &Tx, id: Uuid) -> impl Future<Output = Result<(), ClusterError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait BootstrapTokenRepository: Send + Sync {
    /// Fails only when the randomness source is unavailable.
    fn generate_token(&self) -> Result<BootstrapToken, ClusterError>;
}
