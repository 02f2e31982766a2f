pub mod cluster_postgres_repository;
pub mod cluster_secret_postgres_repository;
pub mod cluster_spec_postgres_repository;
pub mod cluster_status_postgres_repository;
