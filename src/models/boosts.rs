use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::enums::TypeBoost;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boosts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub prestataire_id: i32,

    // Portée optionnelle: une offre précise, une région ou une catégorie.
    // Un boost MENSUEL/EXPERIENCE sans portée s'applique à tout le compte.
    pub offre_id: Option<i32>,
    pub region: Option<String>,
    pub categorie: Option<String>,

    #[serde(rename = "type")]
    #[sea_orm(column_name = "type")]
    pub type_boost: TypeBoost,

    // Fenêtre de validité. Aucun balayeur ne remet est_actif à false à
    // l'expiration: le filtrage se fait à la lecture (fenêtre + flag).
    pub date_debut: DateTime,
    pub date_fin: DateTime,
    pub est_actif: bool,

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

    #[sea_orm(
        belongs_to = "super::offres::Entity",
        from = "Column::OffreId",
        to = "super::offres::Column::Id"
    )]
    Offre,
}

impl Related<super::prestataires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prestataire.def()
    }
}

impl Related<super::offres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offre.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
