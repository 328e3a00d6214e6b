use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    // Destinataire: un user OU un prestataire, jamais les deux
    pub user_id: Option<i32>,
    pub prestataire_id: Option<i32>,

    pub titre: String,
    pub message: String,
    pub lien: Option<String>, // lien profond optionnel vers la ressource concernée

    pub est_lue: bool,

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
        belongs_to = "super::prestataires::Entity",
        from = "Column::PrestataireId",
        to = "super::prestataires::Column::Id"
    )]
    Prestataire,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::prestataires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prestataire.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
