use sea_orm::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use chrono::Utc;

use crate::errors::ApiError;
use crate::models::{paiements, prestataires, reservations, users};
use crate::models::enums::{MethodePaiement, StatutPaiement, StatutReservation, TypeEvenementParrainage};
use crate::services::auth_service::AuthService;
use crate::services::notification_service::NotificationService;
use crate::services::parrainage_service::ParrainageService;
use crate::services::stripe_service::{FournisseurPaiement, IntentionPaiement};

pub struct PaiementService;

impl PaiementService {
    /// Enregistre un paiement en espèces: le voyageur qui a réservé (ou un
    /// admin), réservation PENDING, aucun paiement PAID existant.
    /// Le paiement passe immédiatement à PAID et la réservation à CONFIRMED.
    pub async fn enregistrer_cash(
        db: &DatabaseConnection,
        user: &users::Model,
        reservation_id: i32,
    ) -> Result<paiements::Model, ApiError> {
        let reservation = Self::trouver_reservation(db, reservation_id).await?;

        if !AuthService::est_proprietaire_ou_admin(user, reservation.user_id) {
            return Err(ApiError::Interdit);
        }

        if reservation.statut != StatutReservation::Pending {
            return Err(ApiError::Validation(
                "La réservation n'est plus en attente".to_string(),
            ));
        }

        let paiement = Self::upsert_paiement(
            db,
            &reservation,
            MethodePaiement::Cash,
            StatutPaiement::Paid,
            None,
        )
        .await?;

        Self::confirmer_apres_paiement(db, reservation).await?;

        Ok(paiement)
    }

    /// Crée une intention de paiement chez le processeur et enregistre un
    /// paiement PENDING référencé par l'id d'intention. La réconciliation
    /// arrive plus tard par webhook.
    pub async fn creer_intention(
        db: &DatabaseConnection,
        fournisseur: &dyn FournisseurPaiement,
        user: &users::Model,
        reservation_id: i32,
    ) -> Result<(paiements::Model, IntentionPaiement), ApiError> {
        let reservation = Self::trouver_reservation(db, reservation_id).await?;

        if !AuthService::est_proprietaire_ou_admin(user, reservation.user_id) {
            return Err(ApiError::Interdit);
        }

        if reservation.statut != StatutReservation::Pending {
            return Err(ApiError::Validation(
                "La réservation n'est plus en attente".to_string(),
            ));
        }

        let montant_centimes = (reservation.montant * Decimal::from(100))
            .to_i64()
            .ok_or_else(|| ApiError::Validation("Montant invalide".to_string()))?;

        // Transfert de destination vers le compte connecté du prestataire
        // quand l'onboarding a été fait
        let prestataire = prestataires::Entity::find_by_id(reservation.prestataire_id)
            .one(db)
            .await?;
        let compte_destination = prestataire.and_then(|p| p.stripe_account_id);

        let intention = fournisseur
            .creer_intention_paiement(
                montant_centimes,
                "eur",
                compte_destination.as_deref(),
                reservation.id,
            )
            .await
            .map_err(ApiError::Externe)?;

        let paiement = Self::upsert_paiement(
            db,
            &reservation,
            MethodePaiement::Stripe,
            StatutPaiement::Pending,
            Some(intention.id.clone()),
        )
        .await?;

        Ok((paiement, intention))
    }

    /// Réconciliation d'un événement webhook déjà authentifié.
    /// Un intent inconnu ou un type d'événement non géré est acquitté sans
    /// effet (le processeur relivre sinon indéfiniment).
    pub async fn traiter_evenement(
        db: &DatabaseConnection,
        type_evenement: &str,
        intent_id: &str,
    ) -> Result<(), ApiError> {
        let paiement = paiements::Entity::find()
            .filter(paiements::Column::StripePaymentIntentId.eq(intent_id))
            .one(db)
            .await?;

        let paiement = match paiement {
            Some(p) => p,
            None => {
                eprintln!("⚠️  Webhook for unknown payment intent: {}", intent_id);
                return Ok(());
            }
        };

        match type_evenement {
            "payment_intent.succeeded" => {
                // relivraison possible: un paiement déjà PAID est acquitté tel quel
                if paiement.statut == StatutPaiement::Paid {
                    return Ok(());
                }

                let reservation_id = paiement.reservation_id;
                let mut actif: paiements::ActiveModel = paiement.into();
                actif.statut = Set(StatutPaiement::Paid);
                actif.date_paiement = Set(Some(Utc::now().naive_utc()));
                actif.update(db).await?;

                let reservation = Self::trouver_reservation(db, reservation_id).await?;
                if reservation.statut == StatutReservation::Pending {
                    Self::confirmer_apres_paiement(db, reservation).await?;
                }

                Ok(())
            }
            "payment_intent.payment_failed" => {
                // le statut de la réservation ne bouge pas sur un échec
                if paiement.statut != StatutPaiement::Paid {
                    let mut actif: paiements::ActiveModel = paiement.into();
                    actif.statut = Set(StatutPaiement::Failed);
                    actif.update(db).await?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Paiement d'une réservation, pour consultation
    pub async fn paiement_de_reservation(
        db: &DatabaseConnection,
        reservation_id: i32,
    ) -> Result<Option<paiements::Model>, ApiError> {
        let paiement = paiements::Entity::find()
            .filter(paiements::Column::ReservationId.eq(reservation_id))
            .one(db)
            .await?;
        Ok(paiement)
    }

    /// Au plus un paiement par réservation: une nouvelle tentative écrase un
    /// enregistrement PENDING/FAILED, jamais un enregistrement PAID.
    async fn upsert_paiement(
        db: &DatabaseConnection,
        reservation: &reservations::Model,
        methode: MethodePaiement,
        statut: StatutPaiement,
        intent_id: Option<String>,
    ) -> Result<paiements::Model, ApiError> {
        let existant = paiements::Entity::find()
            .filter(paiements::Column::ReservationId.eq(reservation.id))
            .one(db)
            .await?;

        let date_paiement = if statut == StatutPaiement::Paid {
            Some(Utc::now().naive_utc())
        } else {
            None
        };

        match existant {
            Some(paiement) => {
                if paiement.statut == StatutPaiement::Paid {
                    return Err(ApiError::Conflit(
                        "Cette réservation est déjà payée".to_string(),
                    ));
                }

                let mut actif: paiements::ActiveModel = paiement.into();
                actif.montant = Set(reservation.montant);
                actif.methode = Set(methode);
                actif.statut = Set(statut);
                actif.stripe_payment_intent_id = Set(intent_id);
                actif.date_paiement = Set(date_paiement);
                Ok(actif.update(db).await?)
            }
            None => {
                let nouveau = paiements::ActiveModel {
                    reservation_id: Set(reservation.id),
                    montant: Set(reservation.montant),
                    methode: Set(methode),
                    statut: Set(statut),
                    stripe_payment_intent_id: Set(intent_id),
                    date_paiement: Set(date_paiement),
                    ..Default::default()
                };
                Ok(nouveau.insert(db).await?)
            }
        }
    }

    /// Suite d'un paiement réussi: réservation CONFIRMED, notifications des
    /// deux parties, crédit de l'événement de parrainage du prestataire.
    async fn confirmer_apres_paiement(
        db: &DatabaseConnection,
        reservation: reservations::Model,
    ) -> Result<(), ApiError> {
        let user_id = reservation.user_id;
        let prestataire_id = reservation.prestataire_id;
        let reservation_id = reservation.id;

        let mut actif: reservations::ActiveModel = reservation.into();
        actif.statut = Set(StatutReservation::Confirmed);
        actif.update(db).await?;

        NotificationService::notifier_user(
            db,
            user_id,
            "Réservation confirmée",
            "Votre paiement a été reçu, la réservation est confirmée",
            Some(format!("/reservations/{}", reservation_id)),
        )
        .await?;

        NotificationService::notifier_prestataire(
            db,
            prestataire_id,
            "Paiement reçu",
            "Une réservation vient d'être payée et confirmée",
            Some(format!("/reservations/{}", reservation_id)),
        )
        .await?;

        ParrainageService::crediter_pour_filleul(
            db,
            prestataire_id,
            TypeEvenementParrainage::ReservationEffectuee,
        )
        .await?;

        Ok(())
    }

    async fn trouver_reservation(
        db: &DatabaseConnection,
        reservation_id: i32,
    ) -> Result<reservations::Model, ApiError> {
        reservations::Entity::find_by_id(reservation_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Introuvable("Réservation introuvable".to_string()))
    }
}
