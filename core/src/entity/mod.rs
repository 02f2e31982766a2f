pub mod prelude;

pub mod cluster_secrets;
pub mod cluster_specs;
pub mod cluster_statuses;
pub mod clusters;
