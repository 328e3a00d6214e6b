use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::enums::{MethodePaiement, StatutPaiement};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "paiements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    // Au plus un paiement par réservation: la FK est UNIQUE.
    // Les nouvelles tentatives écrasent un enregistrement PENDING/FAILED
    // (upsert), jamais un enregistrement PAID.
    #[sea_orm(unique)]
    pub reservation_id: i32,

    pub montant: Decimal,
    pub methode: MethodePaiement,
    pub statut: StatutPaiement,

    pub stripe_payment_intent_id: Option<String>,

    pub date_paiement: Option<DateTime>, // renseigné au passage à PAID

    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reservations::Entity",
        from = "Column::ReservationId",
        to = "super::reservations::Column::Id"
    )]
    Reservation,
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
