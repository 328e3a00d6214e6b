use sea_orm::*;
use rust_decimal::Decimal;
use chrono::NaiveDate;

use crate::errors::ApiError;
use crate::models::{offres, reservations, users};
use crate::models::enums::{Role, StatutReservation};
use crate::services::auth_service::AuthService;
use crate::services::notification_service::NotificationService;

pub struct ReservationService;

impl ReservationService {
    /// montant = prix unitaire × durée en jours × nombre de personnes.
    /// Sans date de fin, la durée vaut 1 (activité d'une journée).
    pub fn calculer_montant(
        prix: Decimal,
        date_debut: NaiveDate,
        date_fin: Option<NaiveDate>,
        nombre_personnes: i32,
    ) -> Decimal {
        let jours = match date_fin {
            Some(fin) => (fin - date_debut).num_days().max(1),
            None => 1,
        };

        prix * Decimal::from(jours) * Decimal::from(nombre_personnes)
    }

    /// Crée une réservation en PENDING sur une offre active.
    /// Le montant est figé à la création, la référence prestataire dénormalisée.
    pub async fn creer(
        db: &DatabaseConnection,
        user: &users::Model,
        offre_id: i32,
        date_debut: NaiveDate,
        date_fin: Option<NaiveDate>,
        nombre_personnes: i32,
    ) -> Result<reservations::Model, ApiError> {
        if nombre_personnes < 1 {
            return Err(ApiError::Validation(
                "Le nombre de personnes doit être au moins 1".to_string(),
            ));
        }

        if let Some(fin) = date_fin {
            if fin < date_debut {
                return Err(ApiError::Validation(
                    "La date de fin doit être postérieure à la date de début".to_string(),
                ));
            }
        }

        let offre = offres::Entity::find_by_id(offre_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Introuvable("Offre introuvable".to_string()))?;

        if !offre.est_active {
            return Err(ApiError::Validation(
                "Cette offre n'est plus disponible".to_string(),
            ));
        }

        let montant = Self::calculer_montant(offre.prix, date_debut, date_fin, nombre_personnes);

        let nouvelle = reservations::ActiveModel {
            user_id: Set(user.id),
            offre_id: Set(offre.id),
            prestataire_id: Set(offre.prestataire_id),
            date_debut: Set(date_debut),
            date_fin: Set(date_fin),
            nombre_personnes: Set(nombre_personnes),
            montant: Set(montant),
            statut: Set(StatutReservation::Pending),
            ..Default::default()
        };

        let reservation = nouvelle.insert(db).await?;

        NotificationService::notifier_prestataire(
            db,
            offre.prestataire_id,
            "Nouvelle réservation",
            &format!("Nouvelle réservation en attente sur « {} »", offre.titre),
            Some(format!("/reservations/{}", reservation.id)),
        )
        .await?;

        Ok(reservation)
    }

    /// Annulation: le voyageur qui a réservé ou un admin, depuis PENDING uniquement
    pub async fn annuler(
        db: &DatabaseConnection,
        user: &users::Model,
        reservation_id: i32,
    ) -> Result<reservations::Model, ApiError> {
        let reservation = Self::trouver(db, reservation_id).await?;

        if !AuthService::est_proprietaire_ou_admin(user, reservation.user_id) {
            return Err(ApiError::Interdit);
        }

        if !reservation.statut.peut_passer_a(StatutReservation::Cancelled) {
            return Err(ApiError::Validation(
                "Seule une réservation en attente peut être annulée".to_string(),
            ));
        }

        let prestataire_id = reservation.prestataire_id;
        let mut active: reservations::ActiveModel = reservation.into();
        active.statut = Set(StatutReservation::Cancelled);
        let reservation = active.update(db).await?;

        NotificationService::notifier_prestataire(
            db,
            prestataire_id,
            "Réservation annulée",
            "Une réservation en attente a été annulée par le voyageur",
            Some(format!("/reservations/{}", reservation.id)),
        )
        .await?;

        Ok(reservation)
    }

    /// Confirmation directe: le prestataire propriétaire ou un admin.
    /// Le chemin normal passe par un paiement réussi (paiement_service).
    pub async fn confirmer(
        db: &DatabaseConnection,
        user: &users::Model,
        profil_id: Option<i32>,
        reservation_id: i32,
    ) -> Result<reservations::Model, ApiError> {
        Self::transition_prestataire(db, user, profil_id, reservation_id, StatutReservation::Confirmed)
            .await
    }

    /// Clôture: le prestataire propriétaire ou un admin, depuis CONFIRMED
    pub async fn terminer(
        db: &DatabaseConnection,
        user: &users::Model,
        profil_id: Option<i32>,
        reservation_id: i32,
    ) -> Result<reservations::Model, ApiError> {
        Self::transition_prestataire(db, user, profil_id, reservation_id, StatutReservation::Completed)
            .await
    }

    async fn transition_prestataire(
        db: &DatabaseConnection,
        user: &users::Model,
        profil_id: Option<i32>,
        reservation_id: i32,
        cible: StatutReservation,
    ) -> Result<reservations::Model, ApiError> {
        let reservation = Self::trouver(db, reservation_id).await?;

        let autorise = user.role == Role::Admin || profil_id == Some(reservation.prestataire_id);
        if !autorise {
            return Err(ApiError::Interdit);
        }

        if !reservation.statut.peut_passer_a(cible) {
            return Err(ApiError::Validation(format!(
                "Transition impossible depuis le statut {:?}",
                reservation.statut
            )));
        }

        let user_id = reservation.user_id;
        let mut active: reservations::ActiveModel = reservation.into();
        active.statut = Set(cible);
        let reservation = active.update(db).await?;

        if cible == StatutReservation::Confirmed {
            NotificationService::notifier_user(
                db,
                user_id,
                "Réservation confirmée",
                "Votre réservation a été confirmée par le prestataire",
                Some(format!("/reservations/{}", reservation.id)),
            )
            .await?;
        }

        Ok(reservation)
    }

    async fn trouver(
        db: &DatabaseConnection,
        reservation_id: i32,
    ) -> Result<reservations::Model, ApiError> {
        reservations::Entity::find_by_id(reservation_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Introuvable("Réservation introuvable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jour(annee: i32, mois: u32, jour: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(annee, mois, jour).unwrap()
    }

    #[test]
    fn test_montant_sans_date_fin() {
        // 5000 × 1 jour × 2 personnes = 10000
        let montant = ReservationService::calculer_montant(
            Decimal::from(5000),
            jour(2026, 8, 10),
            None,
            2,
        );
        assert_eq!(montant, Decimal::from(10000));
    }

    #[test]
    fn test_montant_sur_plusieurs_jours() {
        // 1500 × 3 jours × 4 personnes = 18000
        let montant = ReservationService::calculer_montant(
            Decimal::from(1500),
            jour(2026, 8, 10),
            Some(jour(2026, 8, 13)),
            4,
        );
        assert_eq!(montant, Decimal::from(18000));
    }

    #[test]
    fn test_montant_meme_jour_compte_une_journee() {
        let montant = ReservationService::calculer_montant(
            Decimal::from(200),
            jour(2026, 8, 10),
            Some(jour(2026, 8, 10)),
            1,
        );
        assert_eq!(montant, Decimal::from(200));
    }
}
