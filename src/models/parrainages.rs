use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::enums::StatutParrainage;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parrainages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub parrain_id: i32, // prestataire qui a partagé son code

    // Un prestataire ne peut être parrainé qu'une fois
    #[sea_orm(unique)]
    pub filleul_id: i32,

    pub statut: StatutParrainage,

    // Cumul des points crédités au parrain via ce parrainage
    pub points_gagnes: i32,

    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prestataires::Entity",
        from = "Column::ParrainId",
        to = "super::prestataires::Column::Id"
    )]
    Parrain,

    #[sea_orm(
        belongs_to = "super::prestataires::Entity",
        from = "Column::FilleulId",
        to = "super::prestataires::Column::Id"
    )]
    Filleul,

    #[sea_orm(has_many = "super::parrainage_evenements::Entity")]
    Evenement,
}

// Deux relations vers prestataires: Related ne peut en porter qu'une,
// le côté Filleul passe par Relation::Filleul.def() explicitement.
impl Related<super::prestataires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parrain.def()
    }
}

impl Related<super::parrainage_evenements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evenement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
