use tracing::{debug, error, info};

use crate::domain::{
    cluster::{
        entities::{
            Cluster, ClusterError, ClusterPhase, ClusterSecretView, ClusterSpecView,
            ClusterStatusView, ClusterView, CreationStep,
        },
        ports::{
            BootstrapTokenRepository, ClusterRepository, ClusterSecretRepository, ClusterService,
            ClusterSpecRepository, ClusterStatusRepository, TransactionManager,
        },
        value_objects::{
            CreateClusterRecordRequest, CreateClusterRequest, CreateClusterSpecRequest, Page,
            PageRequest,
        },
    },
    common::services::Service,
};

impl<TM, C, SP, ST, SE, BT> Service<TM, C, SP, ST, SE, BT>
where
    TM: TransactionManager,
    C: ClusterRepository<TM::Transaction>,
    SP: ClusterSpecRepository<TM::Transaction>,
    ST: ClusterStatusRepository<TM::Transaction>,
    SE: ClusterSecretRepository<TM::Transaction>,
    BT: BootstrapTokenRepository,
{
    /// Writes the four rows of the aggregate. Owned parts go first so the
    /// cluster row only ever references persisted ids.
    async fn persist_cluster(
        &self,
        tx: &TM::Transaction,
        request: CreateClusterRequest,
    ) -> Result<Cluster, ClusterError> {
        let spec = self
            .cluster_spec_repository
            .save(tx, CreateClusterSpecRequest::from(&request))
            .await
            .map_err(|e| ClusterError::creation(CreationStep::SaveSpec, e))?;

        let status = self
            .cluster_status_repository
            .save(tx, ClusterPhase::Waiting)
            .await
            .map_err(|e| ClusterError::creation(CreationStep::SaveStatus, e))?;

        let token = self
            .bootstrap_token_repository
            .generate_token()
            .map_err(|e| ClusterError::creation(CreationStep::GenerateToken, e))?;
        debug!("bootstrap token {} generated", token.token_id());

        let secret = self
            .cluster_secret_repository
            .save(tx, token)
            .await
            .map_err(|e| ClusterError::creation(CreationStep::SaveSecret, e))?;

        self.cluster_repository
            .save(
                tx,
                CreateClusterRecordRequest {
                    name: request.name,
                    spec_id: spec.id,
                    status_id: status.id,
                    secret_id: secret.id,
                },
            )
            .await
            .map_err(|e| ClusterError::creation(CreationStep::SaveCluster, e))
    }

    async fn remove_cluster(
        &self,
        tx: &TM::Transaction,
        cluster: &Cluster,
    ) -> Result<(), ClusterError> {
        self.cluster_repository.delete(tx, cluster.id).await?;
        self.cluster_spec_repository.delete(tx, cluster.spec_id).await?;
        self.cluster_status_repository.delete(tx, cluster.status_id).await?;
        self.cluster_secret_repository.delete(tx, cluster.secret_id).await?;

        Ok(())
    }

    async fn rollback(&self, tx: TM::Transaction) {
        if let Err(e) = self.transaction_manager.rollback(tx).await {
            error!("Failed to roll back transaction: {}", e);
        }
    }
}

impl<TM, C, SP, ST, SE, BT> ClusterService for Service<TM, C, SP, ST, SE, BT>
where
    TM: TransactionManager,
    C: ClusterRepository<TM::Transaction>,
    SP: ClusterSpecRepository<TM::Transaction>,
    ST: ClusterStatusRepository<TM::Transaction>,
    SE: ClusterSecretRepository<TM::Transaction>,
    BT: BootstrapTokenRepository,
{
    async fn create_cluster(&self, request: CreateClusterRequest) -> Result<Cluster, ClusterError> {
        if request.name.trim().is_empty() {
            return Err(ClusterError::Validation("Cluster name cannot be empty".to_string()));
        }

        let name = request.name.clone();
        let tx = self
            .transaction_manager
            .begin()
            .await
            .map_err(|e| ClusterError::creation(CreationStep::Begin, e))?;

        let cluster = match self.persist_cluster(&tx, request).await {
            Ok(cluster) => cluster,
            Err(e) => {
                error!("Failed to create cluster {}: {}", name, e);
                self.rollback(tx).await;
                return Err(e);
            }
        };

        self.transaction_manager
            .commit(tx)
            .await
            .map_err(|e| ClusterError::creation(CreationStep::Commit, e))?;

        info!("cluster {} created", cluster.name);
        Ok(cluster)
    }

    async fn get_cluster(&self, name: &str) -> Result<ClusterView, ClusterError> {
        let cluster = self.cluster_repository.get_by_name(name).await?;

        Ok(ClusterView::from(cluster))
    }

    async fn get_cluster_spec(&self, name: &str) -> Result<ClusterSpecView, ClusterError> {
        let cluster = self.cluster_repository.get_by_name(name).await?;
        let spec = self.cluster_spec_repository.get(cluster.spec_id).await?;

        Ok(ClusterSpecView { cluster, spec })
    }

    async fn get_cluster_status(&self, name: &str) -> Result<ClusterStatusView, ClusterError> {
        let cluster = self.cluster_repository.get_by_name(name).await?;
        let status = self.cluster_status_repository.get(cluster.status_id).await?;

        Ok(ClusterStatusView { cluster, status })
    }

    async fn get_cluster_secret(&self, name: &str) -> Result<ClusterSecretView, ClusterError> {
        let cluster = self.cluster_repository.get_by_name(name).await?;
        let secret = self.cluster_secret_repository.get(cluster.secret_id).await?;

        Ok(ClusterSecretView { cluster, secret })
    }

    async fn list_clusters(&self) -> Result<Vec<ClusterView>, ClusterError> {
        let clusters = self.cluster_repository.list().await?;

        Ok(clusters.into_iter().map(ClusterView::from).collect())
    }

    async fn page_clusters(&self, page: PageRequest) -> Result<Page<ClusterView>, ClusterError> {
        page.validate()?;

        let clusters = self.cluster_repository.page(page).await?;

        Ok(clusters.map(ClusterView::from))
    }

    async fn delete_cluster(&self, name: &str) -> Result<(), ClusterError> {
        let cluster = self.cluster_repository.get_by_name(name).await?;

        let tx = self.transaction_manager.begin().await?;
        if let Err(e) = self.remove_cluster(&tx, &cluster).await {
            error!("Failed to delete cluster {}: {}", name, e);
            self.rollback(tx).await;
            return Err(e);
        }
        self.transaction_manager.commit(tx).await?;

        info!("cluster {} deleted", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mockall::{Sequence, predicate::eq};

    use crate::domain::{
        cluster::{
            entities::{ClusterError, ClusterPhase, CreationStep},
            ports::ClusterService,
            test_helpers::{
                create_cluster, create_cluster_secret, create_cluster_spec, create_cluster_status,
                create_default_request, create_request_with_name, scenarios,
            },
            value_objects::{Page, PageRequest},
        },
        common::testing::ServiceTestBuilder,
    };

    #[tokio::test]
    async fn test_create_cluster_persists_parts_before_cluster() {
        // Arrange
        let mut seq = Sequence::new();
        let spec = create_cluster_spec();
        let status = create_cluster_status(ClusterPhase::Waiting);
        let secret = create_cluster_secret();
        let cluster = create_cluster("demo", &spec, &status, &secret);

        let service = ServiceTestBuilder::new()
            .with_transaction_manager(|mock| {
                mock.expect_begin()
                    .times(1)
                    .in_sequence(&mut seq)
                    .returning(|| Box::pin(async { Ok(()) }));
            })
            .with_cluster_spec_repo(|mock| {
                let spec = spec.clone();
                mock.expect_save()
                    .withf(|_, request| {
                        request.runtime_type == "containerd"
                            && request.network_type == "calico"
                            && request.cluster_cidr == "10.0.0.0/16"
                    })
                    .times(1)
                    .in_sequence(&mut seq)
                    .returning(move |_, _| {
                        let spec = spec.clone();
                        Box::pin(async move { Ok(spec) })
                    });
            })
            .with_cluster_status_repo(|mock| {
                let status = status.clone();
                mock.expect_save()
                    .withf(|_, phase| *phase == ClusterPhase::Waiting)
                    .times(1)
                    .in_sequence(&mut seq)
                    .returning(move |_, _| {
                        let status = status.clone();
                        Box::pin(async move { Ok(status) })
                    });
            })
            .with_bootstrap_token_repo(|mock| {
                let token = secret.kubeadm_token.clone();
                mock.expect_generate_token()
                    .times(1)
                    .in_sequence(&mut seq)
                    .returning(move || Ok(token.clone()));
            })
            .with_cluster_secret_repo(|mock| {
                let secret = secret.clone();
                mock.expect_save()
                    .times(1)
                    .in_sequence(&mut seq)
                    .returning(move |_, _| {
                        let secret = secret.clone();
                        Box::pin(async move { Ok(secret) })
                    });
            })
            .with_cluster_repo(|mock| {
                let cluster = cluster.clone();
                let (spec_id, status_id, secret_id) = (spec.id, status.id, secret.id);
                mock.expect_save()
                    .withf(move |_, request| {
                        request.name == "demo"
                            && request.spec_id == spec_id
                            && request.status_id == status_id
                            && request.secret_id == secret_id
                    })
                    .times(1)
                    .in_sequence(&mut seq)
                    .returning(move |_, _| {
                        let cluster = cluster.clone();
                        Box::pin(async move { Ok(cluster) })
                    });
            })
            .with_transaction_manager(|mock| {
                mock.expect_commit()
                    .times(1)
                    .in_sequence(&mut seq)
                    .returning(|_| Box::pin(async { Ok(()) }));
                mock.expect_rollback().never();
            })
            .build();

        // Act
        let result = service.create_cluster(create_default_request()).await;

        // Assert
        assert_eq!(result, Ok(cluster));
    }

    #[tokio::test]
    async fn test_create_cluster_empty_name_fails() {
        let service = ServiceTestBuilder::new()
            .with_transaction_manager(|mock| {
                mock.expect_begin().never();
            })
            .build();

        for name in ["", "   "] {
            let result = service.create_cluster(create_request_with_name(name)).await;

            match result {
                Err(ClusterError::Validation(message)) => {
                    assert_eq!(message, "Cluster name cannot be empty");
                }
                other => panic!("Expected Validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_create_cluster_rolls_back_on_each_failing_step() {
        for failing_step in [
            CreationStep::SaveSpec,
            CreationStep::SaveStatus,
            CreationStep::GenerateToken,
            CreationStep::SaveSecret,
            CreationStep::SaveCluster,
        ] {
            // Arrange
            let service = scenarios::fails_at(failing_step);

            // Act
            let result = service.create_cluster(create_default_request()).await;

            // Assert
            match result {
                Err(ClusterError::Creation { step, .. }) => assert_eq!(step, failing_step),
                other => panic!("Expected Creation error for {failing_step}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_create_cluster_duplicate_name_surfaces_validation_error() {
        let service = scenarios::fails_at(CreationStep::SaveCluster);

        let error = service
            .create_cluster(create_default_request())
            .await
            .unwrap_err();

        assert!(matches!(error.root(), ClusterError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_cluster_token_failure_is_not_retried() {
        let service = scenarios::fails_at(CreationStep::GenerateToken);

        let error = service
            .create_cluster(create_default_request())
            .await
            .unwrap_err();

        assert!(matches!(error.root(), ClusterError::Generation(_)));
    }

    #[tokio::test]
    async fn test_create_cluster_begin_failure_touches_no_repository() {
        let service = ServiceTestBuilder::new()
            .with_transaction_manager(|mock| {
                mock.expect_begin().times(1).returning(|| {
                    Box::pin(async {
                        Err(ClusterError::Storage("connection refused".to_string()))
                    })
                });
                mock.expect_rollback().never();
            })
            .with_cluster_spec_repo(|mock| {
                mock.expect_save().never();
            })
            .build();

        let error = service
            .create_cluster(create_default_request())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ClusterError::Creation {
                step: CreationStep::Begin,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_get_cluster_not_found() {
        let service = ServiceTestBuilder::new()
            .with_cluster_repo(|mock| {
                mock.expect_get_by_name().returning(|name| {
                    let name = name.to_string();
                    Box::pin(async move { Err(ClusterError::not_found("cluster", name)) })
                });
            })
            .build();

        let result = service.get_cluster("missing").await;

        assert_eq!(
            result,
            Err(ClusterError::NotFound {
                resource: "cluster",
                key: "missing".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_get_cluster_status_resolves_status_reference() {
        // Arrange
        let spec = create_cluster_spec();
        let status = create_cluster_status(ClusterPhase::Waiting);
        let secret = create_cluster_secret();
        let cluster = create_cluster("demo", &spec, &status, &secret);
        let status_id = status.id;

        let service = ServiceTestBuilder::new()
            .with_cluster_repo(|mock| {
                let cluster = cluster.clone();
                mock.expect_get_by_name()
                    .with(eq("demo"))
                    .times(1)
                    .returning(move |_| {
                        let cluster = cluster.clone();
                        Box::pin(async move { Ok(cluster) })
                    });
            })
            .with_cluster_status_repo(|mock| {
                let status = status.clone();
                mock.expect_get()
                    .with(eq(status_id))
                    .times(1)
                    .returning(move |_| {
                        let status = status.clone();
                        Box::pin(async move { Ok(status) })
                    });
            })
            .build();

        // Act
        let view = service.get_cluster_status("demo").await.unwrap();

        // Assert
        assert_eq!(view.cluster, cluster);
        assert_eq!(view.status.phase, ClusterPhase::Waiting);
    }

    #[tokio::test]
    async fn test_get_cluster_secret_fails_when_secret_missing() {
        let spec = create_cluster_spec();
        let status = create_cluster_status(ClusterPhase::Waiting);
        let secret = create_cluster_secret();
        let cluster = create_cluster("demo", &spec, &status, &secret);

        let service = ServiceTestBuilder::new()
            .with_cluster_repo(|mock| {
                mock.expect_get_by_name().returning(move |_| {
                    let cluster = cluster.clone();
                    Box::pin(async move { Ok(cluster) })
                });
            })
            .with_cluster_secret_repo(|mock| {
                mock.expect_get().returning(|id| {
                    Box::pin(async move { Err(ClusterError::not_found("cluster secret", id)) })
                });
            })
            .build();

        let result = service.get_cluster_secret("demo").await;

        assert!(matches!(
            result,
            Err(ClusterError::NotFound {
                resource: "cluster secret",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_list_clusters_propagates_storage_error() {
        let service = ServiceTestBuilder::new()
            .with_cluster_repo(|mock| {
                mock.expect_list().returning(|| {
                    Box::pin(async { Err(ClusterError::Storage("timeout".to_string())) })
                });
            })
            .build();

        let result = service.list_clusters().await;

        assert_eq!(result, Err(ClusterError::Storage("timeout".to_string())));
    }

    #[tokio::test]
    async fn test_list_clusters_empty() {
        let service = ServiceTestBuilder::new()
            .with_cluster_repo(|mock| {
                mock.expect_list().returning(|| Box::pin(async { Ok(Vec::new()) }));
            })
            .build();

        let result = service.list_clusters().await;

        assert_eq!(result, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_page_clusters_rejects_zero_page() {
        let service = ServiceTestBuilder::new()
            .with_cluster_repo(|mock| {
                mock.expect_page().never();
            })
            .build();

        for page in [PageRequest::new(0, 10), PageRequest::new(1, 0)] {
            let result = service.page_clusters(page).await;
            assert!(matches!(result, Err(ClusterError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_page_clusters_keeps_total() {
        let spec = create_cluster_spec();
        let status = create_cluster_status(ClusterPhase::Waiting);
        let secret = create_cluster_secret();
        let cluster = create_cluster("demo", &spec, &status, &secret);

        let service = ServiceTestBuilder::new()
            .with_cluster_repo(|mock| {
                mock.expect_page()
                    .with(eq(PageRequest::new(2, 1)))
                    .returning(move |_| {
                        let cluster = cluster.clone();
                        Box::pin(async move {
                            Ok(Page {
                                total: 3,
                                items: vec![cluster],
                            })
                        })
                    });
            })
            .build();

        let page = service.page_clusters(PageRequest::new(2, 1)).await.unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].cluster.name, "demo");
    }

    #[tokio::test]
    async fn test_delete_cluster_removes_every_part() {
        // Arrange
        let spec = create_cluster_spec();
        let status = create_cluster_status(ClusterPhase::Running);
        let secret = create_cluster_secret();
        let cluster = create_cluster("demo", &spec, &status, &secret);
        let deleted = Arc::new(Mutex::new(Vec::new()));

        let service = ServiceTestBuilder::new()
            .with_transaction_manager(|mock| {
                mock.expect_begin()
                    .times(1)
                    .returning(|| Box::pin(async { Ok(()) }));
                mock.expect_commit()
                    .times(1)
                    .returning(|_| Box::pin(async { Ok(()) }));
            })
            .with_cluster_repo(|mock| {
                let cluster = cluster.clone();
                mock.expect_get_by_name().returning(move |_| {
                    let cluster = cluster.clone();
                    Box::pin(async move { Ok(cluster) })
                });
                let deleted = deleted.clone();
                mock.expect_delete().times(1).returning(move |_, id| {
                    deleted.lock().unwrap().push(id);
                    Box::pin(async { Ok(()) })
                });
            })
            .with_cluster_spec_repo(|mock| {
                let deleted = deleted.clone();
                mock.expect_delete().times(1).returning(move |_, id| {
                    deleted.lock().unwrap().push(id);
                    Box::pin(async { Ok(()) })
                });
            })
            .with_cluster_status_repo(|mock| {
                let deleted = deleted.clone();
                mock.expect_delete().times(1).returning(move |_, id| {
                    deleted.lock().unwrap().push(id);
                    Box::pin(async { Ok(()) })
                });
            })
            .with_cluster_secret_repo(|mock| {
                let deleted = deleted.clone();
                mock.expect_delete().times(1).returning(move |_, id| {
                    deleted.lock().unwrap().push(id);
                    Box::pin(async { Ok(()) })
                });
            })
            .build();

        // Act
        let result = service.delete_cluster("demo").await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(
            *deleted.lock().unwrap(),
            vec![cluster.id, spec.id, status.id, secret.id]
        );
    }

    #[tokio::test]
    async fn test_delete_cluster_rolls_back_on_failure() {
        let spec = create_cluster_spec();
        let status = create_cluster_status(ClusterPhase::Running);
        let secret = create_cluster_secret();
        let cluster = create_cluster("demo", &spec, &status, &secret);

        let service = ServiceTestBuilder::new()
            .with_transaction_manager(|mock| {
                mock.expect_begin()
                    .returning(|| Box::pin(async { Ok(()) }));
                mock.expect_commit().never();
                mock.expect_rollback()
                    .times(1)
                    .returning(|_| Box::pin(async { Ok(()) }));
            })
            .with_cluster_repo(|mock| {
                mock.expect_get_by_name().returning(move |_| {
                    let cluster = cluster.clone();
                    Box::pin(async move { Ok(cluster) })
                });
                mock.expect_delete()
                    .returning(|_, _| Box::pin(async { Ok(()) }));
            })
            .with_cluster_spec_repo(|mock| {
                mock.expect_delete().returning(|_, _| {
                    Box::pin(async { Err(ClusterError::Storage("disk full".to_string())) })
                });
            })
            .build();

        let result = service.delete_cluster("demo").await;

        assert_eq!(result, Err(ClusterError::Storage("disk full".to_string())));
    }
}
