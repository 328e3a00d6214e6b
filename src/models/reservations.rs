use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::enums::StatutReservation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,        // le voyageur qui réserve
    pub offre_id: i32,
    pub prestataire_id: i32, // référence dénormalisée vers le propriétaire de l'offre

    pub date_debut: Date,
    pub date_fin: Option<Date>, // NULL = activité d'une journée

    pub nombre_personnes: i32,
    pub montant: Decimal, // prix × durée × nombre_personnes, figé à la création

    pub statut: StatutReservation,

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

    #[sea_orm(
        belongs_to = "super::prestataires::Entity",
        from = "Column::PrestataireId",
        to = "super::prestataires::Column::Id"
    )]
    Prestataire,

    #[sea_orm(has_one = "super::paiements::Entity")]
    Paiement,
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

impl Related<super::prestataires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prestataire.def()
    }
}

impl Related<super::paiements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Paiement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
