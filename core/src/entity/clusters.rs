use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "clusters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub spec_id: Uuid,
    #[sea_orm(unique)]
    pub status_id: Uuid,
    #[sea_orm(unique)]
    pub secret_id: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cluster_specs::Entity",
        from = "Column::SpecId",
        to = "super::cluster_specs::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    ClusterSpecs,
    #[sea_orm(
        belongs_to = "super::cluster_statuses::Entity",
        from = "Column::StatusId",
        to = "super::cluster_statuses::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    ClusterStatuses,
    #[sea_orm(
        belongs_to = "super::cluster_secrets::Entity",
        from = "Column::SecretId",
        to = "super::cluster_secrets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    ClusterSecrets,
}

impl Related<super::cluster_specs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClusterSpecs.def()
    }
}

impl Related<super::cluster_statuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClusterStatuses.def()
    }
}

impl Related<super::cluster_secrets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClusterSecrets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
