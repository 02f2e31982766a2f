use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identity record of a cluster. Only references its owned parts, it never
/// carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: Uuid,
    pub name: String,
    pub spec_id: Uuid,
    pub status_id: Uuid,
    pub secret_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Provisioning parameters captured once at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub id: Uuid,
    pub runtime_type: String,
    pub docker_storage_dir: String,
    pub containerd_storage_dir: String,
    pub network_type: String,
    pub cluster_cidr: String,
    pub service_cidr: String,
    pub version: String,
    pub app_domain: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatus {
    pub id: Uuid,
    pub phase: ClusterPhase,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterPhase {
    Waiting,
    Initializing,
    Running,
    Failed,
    NotReady,
    Terminating,
}

impl ClusterPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterPhase::Waiting => "Waiting",
            ClusterPhase::Initializing => "Initializing",
            ClusterPhase::Running => "Running",
            ClusterPhase::Failed => "Failed",
            ClusterPhase::NotReady => "NotReady",
            ClusterPhase::Terminating => "Terminating",
        }
    }
}

impl fmt::Display for ClusterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ClusterPhase {
    type Error = ClusterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Waiting" => Ok(ClusterPhase::Waiting),
            "Initializing" => Ok(ClusterPhase::Initializing),
            "Running" => Ok(ClusterPhase::Running),
            "Failed" => Ok(ClusterPhase::Failed),
            "NotReady" => Ok(ClusterPhase::NotReady),
            "Terminating" => Ok(ClusterPhase::Terminating),
            _ => Err(ClusterError::Storage(format!("unknown cluster phase: {value}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSecret {
    pub id: Uuid,
    pub kubeadm_token: BootstrapToken,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join token handed to new cluster members, in the kubeadm `<id>.<secret>` shape.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BootstrapToken(String);

impl BootstrapToken {
    pub const ID_LEN: usize = 6;
    pub const SECRET_LEN: usize = 16;

    pub fn new(value: impl Into<String>) -> Self {
        BootstrapToken(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public half of the token, safe to show in logs.
    pub fn token_id(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for BootstrapToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BootstrapToken({}.****************)", self.token_id())
    }
}

/// Cluster core without any owned part resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterView {
    pub cluster: Cluster,
}

impl From<Cluster> for ClusterView {
    fn from(cluster: Cluster) -> Self {
        Self { cluster }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpecView {
    pub cluster: Cluster,
    pub spec: ClusterSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatusView {
    pub cluster: Cluster,
    pub status: ClusterStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSecretView {
    pub cluster: Cluster,
    pub secret: ClusterSecret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStep {
    Begin,
    SaveSpec,
    SaveStatus,
    GenerateToken,
    SaveSecret,
    SaveCluster,
    Commit,
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            CreationStep::Begin => "begin transaction",
            CreationStep::SaveSpec => "save cluster spec",
            CreationStep::SaveStatus => "save cluster status",
            CreationStep::GenerateToken => "generate bootstrap token",
            CreationStep::SaveSecret => "save cluster secret",
            CreationStep::SaveCluster => "save cluster",
            CreationStep::Commit => "commit transaction",
        };
        f.write_str(step)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bootstrap token generation error: {0}")]
    Generation(String),

    #[error("Cluster creation failed to {step}: {source}")]
    Creation {
        step: CreationStep,
        #[source]
        source: Box<ClusterError>,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ClusterError {
    pub fn not_found(resource: &'static str, key: impl ToString) -> Self {
        ClusterError::NotFound {
            resource,
            key: key.to_string(),
        }
    }

    pub fn creation(step: CreationStep, source: ClusterError) -> Self {
        ClusterError::Creation {
            step,
            source: Box::new(source),
        }
    }

    /// The originating error, looking through the creation wrapper.
    pub fn root(&self) -> &ClusterError {
        match self {
            ClusterError::Creation { source, .. } => source.root(),
            other => other,
        }
    }
}
