use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "depenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub prestataire_id: i32,

    pub libelle: String,
    pub montant: Decimal,
    pub categorie: Option<String>,
    pub date_depense: Date,

    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prestataires::Entity",
        from = "Column::PrestataireId",
        to = "super::prestataires::Column::Id"
    )]
    Prestataire,
}

impl Related<super::prestataires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prestataire.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
