use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::enums::Role;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    // Contrainte UNIQUE (email, role) côté migration: le même email peut
    // détenir un compte USER et un compte PRESTATAIRE
    pub email: String,
    pub nom: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // NULL pour les comptes Google
    pub role: Role,
    pub google_id: Option<String>,
    pub est_suspendu: bool,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::prestataires::Entity")]
    Prestataire,

    #[sea_orm(has_many = "super::reservations::Entity")]
    Reservation,

    #[sea_orm(has_many = "super::avis::Entity")]
    Avis,

    #[sea_orm(has_many = "super::favoris::Entity")]
    Favori,

    #[sea_orm(has_many = "super::notifications::Entity")]
    Notification,
}

impl Related<super::prestataires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prestataire.def()
    }
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl Related<super::avis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Avis.def()
    }
}

impl Related<super::favoris::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favori.def()
    }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
