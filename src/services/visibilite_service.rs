use chrono::NaiveDateTime;

use crate::models::{boosts, offres};
use crate::models::enums::{PlanAbonnement, TypeBoost};

pub struct VisibiliteService;

impl VisibiliteService {
    /// Score de visibilité d'une offre, recalculé à la demande pour le tri
    /// (aucun état persisté):
    ///   base du plan + bonus du boost actif + note×10 + min(avis×2, 100)
    pub fn score_visibilite(
        plan: PlanAbonnement,
        boost: Option<TypeBoost>,
        note_moyenne: f64,
        nombre_avis: i32,
    ) -> i32 {
        let base = match plan {
            PlanAbonnement::Premium => 1000,
            PlanAbonnement::Pro => 500,
            PlanAbonnement::Gratuit => 0,
        };

        let bonus = match boost {
            Some(type_boost) => Self::bonus_boost(type_boost),
            None => 0,
        };

        let points_note = (note_moyenne * 10.0).round() as i32;
        let points_avis = (nombre_avis * 2).min(100);

        base + bonus + points_note + points_avis
    }

    pub fn bonus_boost(type_boost: TypeBoost) -> i32 {
        match type_boost {
            TypeBoost::Mensuel => 500,
            TypeBoost::Regional => 300,
            TypeBoost::Categorie => 200,
            TypeBoost::Experience => 100,
        }
    }

    /// Un boost s'applique-t-il à une offre à l'instant donné ?
    /// Politique d'expiration: filtrage à la lecture (flag ET fenêtre de
    /// validité), aucun balayeur ne désactive les boosts expirés.
    pub fn boost_applicable(
        boost: &boosts::Model,
        offre: &offres::Model,
        maintenant: NaiveDateTime,
    ) -> bool {
        if boost.prestataire_id != offre.prestataire_id {
            return false;
        }
        if !boost.est_actif {
            return false;
        }
        if maintenant < boost.date_debut || maintenant > boost.date_fin {
            return false;
        }

        // Portée: offre précise > région > catégorie > tout le compte
        if let Some(offre_id) = boost.offre_id {
            return offre_id == offre.id;
        }
        if let Some(region) = &boost.region {
            return region == &offre.region;
        }
        if let Some(categorie) = &boost.categorie {
            return categorie == &offre.categorie;
        }

        true
    }

    /// Meilleur boost applicable à une offre (bonus le plus élevé)
    pub fn meilleur_boost(
        boosts: &[boosts::Model],
        offre: &offres::Model,
        maintenant: NaiveDateTime,
    ) -> Option<TypeBoost> {
        boosts
            .iter()
            .filter(|b| Self::boost_applicable(b, offre, maintenant))
            .map(|b| b.type_boost)
            .max_by_key(|t| Self::bonus_boost(*t))
    }

    /// Plafond d'offres actives par plan. None = illimité.
    pub fn limite_offres_actives(plan: PlanAbonnement) -> Option<u64> {
        match plan {
            PlanAbonnement::Gratuit => Some(3),
            PlanAbonnement::Pro => Some(15),
            PlanAbonnement::Premium => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn instant(jour: u32, heure: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, jour)
            .unwrap()
            .and_hms_opt(heure, 0, 0)
            .unwrap()
    }

    fn offre() -> offres::Model {
        offres::Model {
            id: 1,
            prestataire_id: 10,
            titre: "Excursion désert".to_string(),
            description: None,
            prix: Decimal::from(5000),
            categorie: "AVENTURE".to_string(),
            region: "Sud".to_string(),
            est_active: true,
            est_en_vedette: false,
            vedette_jusqua: None,
            somme_notes: 0,
            nombre_avis: 0,
            created_at: None,
        }
    }

    fn boost(type_boost: TypeBoost) -> boosts::Model {
        boosts::Model {
            id: 1,
            prestataire_id: 10,
            offre_id: None,
            region: None,
            categorie: None,
            type_boost,
            date_debut: instant(1, 0),
            date_fin: instant(31, 0),
            est_actif: true,
            created_at: None,
        }
    }

    #[test]
    fn test_score_par_plan() {
        assert_eq!(
            VisibiliteService::score_visibilite(PlanAbonnement::Gratuit, None, 0.0, 0),
            0
        );
        assert_eq!(
            VisibiliteService::score_visibilite(PlanAbonnement::Pro, None, 0.0, 0),
            500
        );
        assert_eq!(
            VisibiliteService::score_visibilite(PlanAbonnement::Premium, None, 0.0, 0),
            1000
        );
    }

    #[test]
    fn test_score_complet() {
        // PREMIUM (1000) + MENSUEL (500) + 4.5×10 (45) + min(12×2, 100) (24)
        let score = VisibiliteService::score_visibilite(
            PlanAbonnement::Premium,
            Some(TypeBoost::Mensuel),
            4.5,
            12,
        );
        assert_eq!(score, 1569);
    }

    #[test]
    fn test_points_avis_plafonnes_a_100() {
        let score =
            VisibiliteService::score_visibilite(PlanAbonnement::Gratuit, None, 0.0, 1000);
        assert_eq!(score, 100);
    }

    #[test]
    fn test_boost_expire_ne_s_applique_pas() {
        let b = boost(TypeBoost::Mensuel);
        // dans la fenêtre
        assert!(VisibiliteService::boost_applicable(&b, &offre(), instant(15, 12)));
        // après la fenêtre, même avec est_actif = true
        let mut apres = b.clone();
        apres.date_fin = instant(10, 0);
        assert!(!VisibiliteService::boost_applicable(&apres, &offre(), instant(15, 12)));
    }

    #[test]
    fn test_boost_desactive_ne_s_applique_pas() {
        let mut b = boost(TypeBoost::Mensuel);
        b.est_actif = false;
        assert!(!VisibiliteService::boost_applicable(&b, &offre(), instant(15, 12)));
    }

    #[test]
    fn test_boost_regional_filtre_sur_la_region() {
        let mut b = boost(TypeBoost::Regional);
        b.region = Some("Sud".to_string());
        assert!(VisibiliteService::boost_applicable(&b, &offre(), instant(15, 12)));

        b.region = Some("Nord".to_string());
        assert!(!VisibiliteService::boost_applicable(&b, &offre(), instant(15, 12)));
    }

    #[test]
    fn test_boost_d_un_autre_prestataire_ignore() {
        let mut b = boost(TypeBoost::Mensuel);
        b.prestataire_id = 99;
        assert!(!VisibiliteService::boost_applicable(&b, &offre(), instant(15, 12)));
    }

    #[test]
    fn test_meilleur_boost_prend_le_bonus_max() {
        let boosts = vec![boost(TypeBoost::Experience), boost(TypeBoost::Mensuel)];
        assert_eq!(
            VisibiliteService::meilleur_boost(&boosts, &offre(), instant(15, 12)),
            Some(TypeBoost::Mensuel)
        );
    }

    #[test]
    fn test_limites_par_plan() {
        assert_eq!(
            VisibiliteService::limite_offres_actives(PlanAbonnement::Gratuit),
            Some(3)
        );
        assert_eq!(
            VisibiliteService::limite_offres_actives(PlanAbonnement::Pro),
            Some(15)
        );
        assert_eq!(
            VisibiliteService::limite_offres_actives(PlanAbonnement::Premium),
            None
        );
    }
}
