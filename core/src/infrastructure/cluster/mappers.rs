use chrono::{TimeZone, Utc};

use crate::{
    domain::cluster::entities::{
        BootstrapToken, Cluster, ClusterError, ClusterPhase, ClusterSecret, ClusterSpec,
        ClusterStatus,
    },
    entity::{cluster_secrets, cluster_specs, cluster_statuses, clusters},
};

impl From<clusters::Model> for Cluster {
    fn from(model: clusters::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            spec_id: model.spec_id,
            status_id: model.status_id,
            secret_id: model.secret_id,
            created_at: Utc.from_utc_datetime(&model.created_at),
            updated_at: Utc.from_utc_datetime(&model.updated_at),
        }
    }
}

impl From<cluster_specs::Model> for ClusterSpec {
    fn from(model: cluster_specs::Model) -> Self {
        Self {
            id: model.id,
            runtime_type: model.runtime_type,
            docker_storage_dir: model.docker_storage_dir,
            containerd_storage_dir: model.containerd_storage_dir,
            network_type: model.network_type,
            cluster_cidr: model.cluster_cidr,
            service_cidr: model.service_cidr,
            version: model.version,
            app_domain: model.app_domain,
            created_at: Utc.from_utc_datetime(&model.created_at),
            updated_at: Utc.from_utc_datetime(&model.updated_at),
        }
    }
}

impl TryFrom<cluster_statuses::Model> for ClusterStatus {
    type Error = ClusterError;

    fn try_from(model: cluster_statuses::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            phase: ClusterPhase::try_from(model.phase)?,
            message: model.message,
            created_at: Utc.from_utc_datetime(&model.created_at),
            updated_at: Utc.from_utc_datetime(&model.updated_at),
        })
    }
}

impl From<cluster_secrets::Model> for ClusterSecret {
    fn from(model: cluster_secrets::Model) -> Self {
        Self {
            id: model.id,
            kubeadm_token: BootstrapToken::new(model.kubeadm_token),
            created_at: Utc.from_utc_datetime(&model.created_at),
            updated_at: Utc.from_utc_datetime(&model.updated_at),
        }
    }
}
