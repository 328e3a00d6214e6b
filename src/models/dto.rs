//pour les réponses structurées
use serde::Serialize;
use rust_decimal::Decimal;

use super::offres;

// 1 offre du listing public, enrichie de sa moyenne et de son score de visibilité
#[derive(Debug, Serialize)]
pub struct OffreAvecScore {
    pub offre: offres::Model,
    pub note_moyenne: f64,
    pub score: i32,
}

#[derive(Debug, Serialize)]
pub struct ParrainageStats {
    pub total_parrainages: u64,
    pub parrainages_completes: u64,
    pub total_points_gagnes: i64,
    pub points_disponibles: i32,
}

#[derive(Debug, Serialize)]
pub struct StatistiquesAdmin {
    pub total_users: u64,
    pub total_prestataires: u64,
    pub total_offres: u64,
    pub total_reservations: u64,
    pub reservations_confirmees: u64,
    pub revenus_confirmes: Decimal,
}
