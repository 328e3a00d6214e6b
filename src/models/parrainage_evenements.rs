use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::enums::TypeEvenementParrainage;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parrainage_evenements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    // Contrainte UNIQUE (parrainage_id, type_evenement) côté migration:
    // un type d'événement n'est crédité qu'une fois par parrainage
    pub parrainage_id: i32,
    pub type_evenement: TypeEvenementParrainage,

    pub points: i32, // points crédités pour cet événement

    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parrainages::Entity",
        from = "Column::ParrainageId",
        to = "super::parrainages::Column::Id"
    )]
    Parrainage,
}

impl Related<super::parrainages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parrainage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
