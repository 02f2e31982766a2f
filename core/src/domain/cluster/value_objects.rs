use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cluster::entities::ClusterError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClusterRequest {
    pub name: String,
    pub runtime_type: String,
    pub docker_storage_dir: String,
    pub containerd_storage_dir: String,
    pub network_type: String,
    pub cluster_cidr: String,
    pub service_cidr: String,
    pub version: String,
    pub app_domain: String,
}

/// Spec fields as handed to the spec repository, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateClusterSpecRequest {
    pub runtime_type: String,
    pub docker_storage_dir: String,
    pub containerd_storage_dir: String,
    pub network_type: String,
    pub cluster_cidr: String,
    pub service_cidr: String,
    pub version: String,
    pub app_domain: String,
}

impl From<&CreateClusterRequest> for CreateClusterSpecRequest {
    fn from(request: &CreateClusterRequest) -> Self {
        Self {
            runtime_type: request.runtime_type.clone(),
            docker_storage_dir: request.docker_storage_dir.clone(),
            containerd_storage_dir: request.containerd_storage_dir.clone(),
            network_type: request.network_type.clone(),
            cluster_cidr: request.cluster_cidr.clone(),
            service_cidr: request.service_cidr.clone(),
            version: request.version.clone(),
            app_domain: request.app_domain.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateClusterRecordRequest {
    pub name: String,
    pub spec_id: Uuid,
    pub status_id: Uuid,
    pub secret_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub num: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// Largest limit or offset a storage query can carry.
const MAX_PAGE_BOUND: u64 = i64::MAX as u64;

impl PageRequest {
    pub fn new(num: u64, size: u64) -> Self {
        Self { num, size }
    }

    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.num == 0 {
            return Err(ClusterError::Validation("Page number starts at 1".to_string()));
        }
        if self.size == 0 {
            return Err(ClusterError::Validation(
                "Page size must be greater than 0".to_string(),
            ));
        }
        if self.size > MAX_PAGE_BOUND {
            return Err(ClusterError::Validation(format!(
                "Page size must not exceed {MAX_PAGE_BOUND}"
            )));
        }
        match self.index().checked_mul(self.size) {
            Some(offset) if offset <= MAX_PAGE_BOUND => Ok(()),
            _ => Err(ClusterError::Validation(format!(
                "Page {} of size {} is out of range",
                self.num, self.size
            ))),
        }
    }

    /// Zero-based index of the requested page.
    pub fn index(&self) -> u64 {
        self.num.saturating_sub(1)
    }
}
