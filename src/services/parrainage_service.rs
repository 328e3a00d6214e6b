use sea_orm::*;
use sea_orm::sea_query::Expr;
use chrono::{Duration, Utc};

use crate::errors::ApiError;
use crate::models::{boosts, parrainage_evenements, parrainages, prestataires};
use crate::models::enums::{StatutParrainage, TypeBoost, TypeEvenementParrainage};
use crate::services::notification_service::NotificationService;

/// Jours de boost EXPERIENCE obtenus par tranche de 100 points convertis
const JOURS_BOOST_PAR_TRANCHE: i64 = 7;

pub struct ParrainageService;

impl ParrainageService {
    /// Barème fixe des points crédités par type d'événement
    pub fn points_pour_evenement(type_evenement: TypeEvenementParrainage) -> i32 {
        match type_evenement {
            TypeEvenementParrainage::InscriptionValidee => 100,
            TypeEvenementParrainage::PremiereOffrePubliee => 50,
            TypeEvenementParrainage::ReservationEffectuee => 25,
            TypeEvenementParrainage::AbonnementPremium => 200,
        }
    }

    /// Idempotence: un type d'événement déjà journalisé pour ce parrainage
    /// ne doit pas être recrédité
    pub fn evenement_deja_credite(
        evenements: &[parrainage_evenements::Model],
        type_evenement: TypeEvenementParrainage,
    ) -> bool {
        evenements.iter().any(|e| e.type_evenement == type_evenement)
    }

    /// Règles de conversion: multiple exact et positif de 100, solde suffisant
    pub fn valider_conversion(points_demandes: i32, solde: i32) -> Result<(), String> {
        if points_demandes <= 0 || points_demandes % 100 != 0 {
            return Err("Le montant doit être un multiple positif de 100 points".to_string());
        }
        if points_demandes > solde {
            return Err("Solde de points insuffisant".to_string());
        }
        Ok(())
    }

    /// À l'inscription d'un filleul avec un code de parrainage: crée le lien
    /// parrain → filleul puis crédite l'événement INSCRIPTION_VALIDEE
    /// (qui fait passer le parrainage à COMPLETE).
    pub async fn creer_depuis_code(
        db: &DatabaseConnection,
        code: &str,
        filleul_id: i32,
    ) -> Result<parrainages::Model, ApiError> {
        let parrain = prestataires::Entity::find()
            .filter(prestataires::Column::CodeParrainage.eq(code))
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Validation("Code de parrainage invalide".to_string()))?;

        if parrain.id == filleul_id {
            return Err(ApiError::Validation(
                "Impossible de se parrainer soi-même".to_string(),
            ));
        }

        let parrainage = parrainages::ActiveModel {
            parrain_id: Set(parrain.id),
            filleul_id: Set(filleul_id),
            statut: Set(StatutParrainage::EnAttente),
            points_gagnes: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Self::crediter_evenement(db, parrainage.id, TypeEvenementParrainage::InscriptionValidee)
            .await?;

        parrainages::Entity::find_by_id(parrainage.id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Introuvable("Parrainage introuvable".to_string()))
    }

    /// Crédite un événement pour un parrainage, au plus une fois par type.
    /// Journal + cumul du parrainage + solde du parrain sont écrits dans la
    /// même transaction. Retourne false si l'événement était déjà crédité.
    pub async fn crediter_evenement(
        db: &DatabaseConnection,
        parrainage_id: i32,
        type_evenement: TypeEvenementParrainage,
    ) -> Result<bool, ApiError> {
        let parrainage = parrainages::Entity::find_by_id(parrainage_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Introuvable("Parrainage introuvable".to_string()))?;

        let evenements = parrainage_evenements::Entity::find()
            .filter(parrainage_evenements::Column::ParrainageId.eq(parrainage_id))
            .all(db)
            .await?;

        if Self::evenement_deja_credite(&evenements, type_evenement) {
            return Ok(false);
        }

        let points = Self::points_pour_evenement(type_evenement);
        let parrain_id = parrainage.parrain_id;

        let txn = db.begin().await?;

        parrainage_evenements::ActiveModel {
            parrainage_id: Set(parrainage_id),
            type_evenement: Set(type_evenement),
            points: Set(points),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut actif: parrainages::ActiveModel = parrainage.clone().into();
        actif.points_gagnes = Set(parrainage.points_gagnes + points);
        if type_evenement == TypeEvenementParrainage::InscriptionValidee {
            actif.statut = Set(StatutParrainage::Complete);
        }
        actif.update(&txn).await?;

        // incrément côté BD, pas de lecture-puis-écriture du solde
        prestataires::Entity::update_many()
            .col_expr(
                prestataires::Column::PointsParrainage,
                Expr::col(prestataires::Column::PointsParrainage).add(points),
            )
            .filter(prestataires::Column::Id.eq(parrain_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        NotificationService::notifier_prestataire(
            db,
            parrain_id,
            "Points de parrainage",
            &format!("Vous avez gagné {} points de parrainage", points),
            Some("/parrainages".to_string()),
        )
        .await?;

        Ok(true)
    }

    /// Crédite un événement pour le parrainage dont le prestataire donné est
    /// le filleul, s'il existe. Sans parrainage, ne fait rien.
    pub async fn crediter_pour_filleul(
        db: &DatabaseConnection,
        filleul_prestataire_id: i32,
        type_evenement: TypeEvenementParrainage,
    ) -> Result<(), ApiError> {
        let parrainage = parrainages::Entity::find()
            .filter(parrainages::Column::FilleulId.eq(filleul_prestataire_id))
            .one(db)
            .await?;

        if let Some(parrainage) = parrainage {
            Self::crediter_evenement(db, parrainage.id, type_evenement).await?;
        }

        Ok(())
    }

    /// Convertit des points en boost EXPERIENCE: chaque tranche de 100 points
    /// donne 7 jours. Le décrément du solde est conditionnel côté BD pour ne
    /// jamais passer sous zéro en cas d'accès concurrents.
    pub async fn convertir_points(
        db: &DatabaseConnection,
        profil: &prestataires::Model,
        points_demandes: i32,
    ) -> Result<boosts::Model, ApiError> {
        Self::valider_conversion(points_demandes, profil.points_parrainage)
            .map_err(ApiError::Validation)?;

        let jours = (points_demandes as i64 / 100) * JOURS_BOOST_PAR_TRANCHE;
        let maintenant = Utc::now().naive_utc();

        let txn = db.begin().await?;

        let resultat = prestataires::Entity::update_many()
            .col_expr(
                prestataires::Column::PointsParrainage,
                Expr::col(prestataires::Column::PointsParrainage).sub(points_demandes),
            )
            .filter(prestataires::Column::Id.eq(profil.id))
            .filter(prestataires::Column::PointsParrainage.gte(points_demandes))
            .exec(&txn)
            .await?;

        if resultat.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ApiError::Validation(
                "Solde de points insuffisant".to_string(),
            ));
        }

        let boost = boosts::ActiveModel {
            prestataire_id: Set(profil.id),
            offre_id: Set(None),
            region: Set(None),
            categorie: Set(None),
            type_boost: Set(TypeBoost::Experience),
            date_debut: Set(maintenant),
            date_fin: Set(maintenant + Duration::days(jours)),
            est_actif: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(boost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evenement(type_evenement: TypeEvenementParrainage) -> parrainage_evenements::Model {
        parrainage_evenements::Model {
            id: 1,
            parrainage_id: 1,
            type_evenement,
            points: ParrainageService::points_pour_evenement(type_evenement),
            created_at: None,
        }
    }

    #[test]
    fn test_bareme_des_points() {
        assert_eq!(
            ParrainageService::points_pour_evenement(TypeEvenementParrainage::InscriptionValidee),
            100
        );
        assert_eq!(
            ParrainageService::points_pour_evenement(TypeEvenementParrainage::PremiereOffrePubliee),
            50
        );
        assert_eq!(
            ParrainageService::points_pour_evenement(TypeEvenementParrainage::ReservationEffectuee),
            25
        );
        assert_eq!(
            ParrainageService::points_pour_evenement(TypeEvenementParrainage::AbonnementPremium),
            200
        );
    }

    #[test]
    fn test_idempotence_par_type() {
        let journal = vec![evenement(TypeEvenementParrainage::InscriptionValidee)];

        assert!(ParrainageService::evenement_deja_credite(
            &journal,
            TypeEvenementParrainage::InscriptionValidee
        ));
        assert!(!ParrainageService::evenement_deja_credite(
            &journal,
            TypeEvenementParrainage::PremiereOffrePubliee
        ));
    }

    #[test]
    fn test_conversion_multiple_de_100_uniquement() {
        assert!(ParrainageService::valider_conversion(100, 500).is_ok());
        assert!(ParrainageService::valider_conversion(300, 500).is_ok());

        assert!(ParrainageService::valider_conversion(0, 500).is_err());
        assert!(ParrainageService::valider_conversion(-100, 500).is_err());
        assert!(ParrainageService::valider_conversion(150, 500).is_err());
    }

    #[test]
    fn test_conversion_solde_insuffisant() {
        assert!(ParrainageService::valider_conversion(200, 100).is_err());
        assert!(ParrainageService::valider_conversion(200, 200).is_ok());
    }
}
