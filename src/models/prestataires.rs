use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::enums::PlanAbonnement;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prestataires")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32, // 1:1 avec un compte de rôle PRESTATAIRE

    pub nom_entreprise: String,
    pub description: Option<String>,
    pub telephone: Option<String>,
    pub region: Option<String>,

    // Vérification automatique à la création (pas de workflow manuel)
    pub est_verifie: bool,

    pub plan: PlanAbonnement,

    #[sea_orm(unique)]
    pub code_parrainage: String, // dérivé d'un UUID v4 à la création

    pub points_parrainage: i32,

    // Compte connecté du processeur de paiement (payouts marketplace)
    pub stripe_account_id: Option<String>,

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

    #[sea_orm(has_many = "super::offres::Entity")]
    Offre,

    #[sea_orm(has_many = "super::reservations::Entity")]
    Reservation,

    #[sea_orm(has_many = "super::boosts::Entity")]
    Boost,

    #[sea_orm(has_many = "super::depenses::Entity")]
    Depense,

    #[sea_orm(has_many = "super::notifications::Entity")]
    Notification,
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

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl Related<super::boosts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boost.def()
    }
}

impl Related<super::depenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Depense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
