use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "avis")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    // Contrainte UNIQUE (user_id, offre_id) côté migration:
    // un seul avis par utilisateur et par offre
    pub user_id: i32,
    pub offre_id: i32,

    pub note: i32, // 1 à 5
    pub commentaire: Option<String>,

    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::offres::Entity",
        from = "Column::OffreId",
        to = "super::offres::Column::Id"
    )]
    Offre,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::offres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offre.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
