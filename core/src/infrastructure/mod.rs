pub mod cluster;
pub mod db;
pub mod repositories;
