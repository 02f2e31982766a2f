pub use super::cluster_secrets::Entity as ClusterSecrets;
pub use super::cluster_specs::Entity as ClusterSpecs;
pub use super::cluster_statuses::Entity as ClusterStatuses;
pub use super::clusters::Entity as Clusters;
