// ============================================================================
// ENUMS - DOMAINES FERMÉS
// ============================================================================
//
// Description:
//   Tous les champs "statut"/"type"/"rôle" sont des enums SeaORM stockés en
//   texte, jamais des String libres. Les prédicats d'autorisation et de
//   transition vivent ici, en match exhaustif.
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rôle d'un compte. Un même email peut détenir un compte par rôle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "PRESTATAIRE")]
    Prestataire,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

impl Role {
    /// Un rôle satisfait-il l'exigence d'un endpoint ?
    /// ADMIN satisfait toutes les exigences.
    pub fn permet(self, requis: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::User => requis == Role::User,
            Role::Prestataire => requis == Role::Prestataire,
        }
    }
}

/// Plan d'abonnement d'un prestataire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanAbonnement {
    #[sea_orm(string_value = "GRATUIT")]
    Gratuit,
    #[sea_orm(string_value = "PRO")]
    Pro,
    #[sea_orm(string_value = "PREMIUM")]
    Premium,
}

/// Statut d'une réservation. Machine à états sans retour en arrière:
/// PENDING -> {CONFIRMED, CANCELLED}, CONFIRMED -> COMPLETED,
/// CANCELLED et COMPLETED sont terminaux.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum StatutReservation {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl StatutReservation {
    pub fn peut_passer_a(self, cible: StatutReservation) -> bool {
        match (self, cible) {
            (StatutReservation::Pending, StatutReservation::Confirmed) => true,
            (StatutReservation::Pending, StatutReservation::Cancelled) => true,
            (StatutReservation::Confirmed, StatutReservation::Completed) => true,
            _ => false,
        }
    }
}

/// Statut d'un paiement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum StatutPaiement {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

/// Méthode de paiement: espèces enregistrées à la main, ou Stripe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum MethodePaiement {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "stripe")]
    Stripe,
}

/// Type de boost de visibilité.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeBoost {
    #[sea_orm(string_value = "MENSUEL")]
    Mensuel,
    #[sea_orm(string_value = "REGIONAL")]
    Regional,
    #[sea_orm(string_value = "CATEGORIE")]
    Categorie,
    #[sea_orm(string_value = "EXPERIENCE")]
    Experience,
}

/// Statut d'un parrainage. Passe à COMPLETE sur l'événement
/// INSCRIPTION_VALIDEE.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatutParrainage {
    #[sea_orm(string_value = "EN_ATTENTE")]
    EnAttente,
    #[sea_orm(string_value = "COMPLETE")]
    Complete,
}

/// Événements de parrainage qui rapportent des points.
/// Chaque type est crédité au plus une fois par parrainage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeEvenementParrainage {
    #[sea_orm(string_value = "INSCRIPTION_VALIDEE")]
    InscriptionValidee,
    #[sea_orm(string_value = "PREMIERE_OFFRE_PUBLIEE")]
    PremiereOffrePubliee,
    #[sea_orm(string_value = "RESERVATION_EFFECTUEE")]
    ReservationEffectuee,
    #[sea_orm(string_value = "ABONNEMENT_PREMIUM")]
    AbonnementPremium,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_satisfait_tous_les_roles() {
        assert!(Role::Admin.permet(Role::User));
        assert!(Role::Admin.permet(Role::Prestataire));
        assert!(Role::Admin.permet(Role::Admin));
    }

    #[test]
    fn test_roles_non_admin_ne_se_croisent_pas() {
        assert!(Role::User.permet(Role::User));
        assert!(!Role::User.permet(Role::Prestataire));
        assert!(!Role::User.permet(Role::Admin));
        assert!(Role::Prestataire.permet(Role::Prestataire));
        assert!(!Role::Prestataire.permet(Role::User));
    }

    #[test]
    fn test_transitions_depuis_pending() {
        assert!(StatutReservation::Pending.peut_passer_a(StatutReservation::Confirmed));
        assert!(StatutReservation::Pending.peut_passer_a(StatutReservation::Cancelled));
        assert!(!StatutReservation::Pending.peut_passer_a(StatutReservation::Completed));
    }

    #[test]
    fn test_etats_terminaux() {
        for cible in [
            StatutReservation::Pending,
            StatutReservation::Confirmed,
            StatutReservation::Cancelled,
            StatutReservation::Completed,
        ] {
            assert!(!StatutReservation::Cancelled.peut_passer_a(cible));
            assert!(!StatutReservation::Completed.peut_passer_a(cible));
        }
    }

    #[test]
    fn test_confirmed_vers_completed_uniquement() {
        assert!(StatutReservation::Confirmed.peut_passer_a(StatutReservation::Completed));
        assert!(!StatutReservation::Confirmed.peut_passer_a(StatutReservation::Pending));
        assert!(!StatutReservation::Confirmed.peut_passer_a(StatutReservation::Cancelled));
    }
}
