use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub prestataire_id: i32,
    pub titre: String,
    pub description: Option<String>,
    pub prix: Decimal, // prix unitaire par personne et par jour
    pub categorie: String,
    pub region: String,
    pub est_active: bool,

    // Mise en vedette bornée dans le temps
    pub est_en_vedette: bool,
    pub vedette_jusqua: Option<DateTime>,

    // Agrégat de notation maintenu par incréments atomiques côté BD
    // (somme courante + compteur, jamais de recalcul lecture-puis-écriture)
    pub somme_notes: i64,
    pub nombre_avis: i32,

    pub created_at: Option<DateTime>,
}

impl Model {
    /// Moyenne dérivée de l'agrégat (somme, compteur). 0 si aucun avis.
    pub fn note_moyenne(&self) -> f64 {
        if self.nombre_avis <= 0 {
            return 0.0;
        }
        self.somme_notes as f64 / self.nombre_avis as f64
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prestataires::Entity",
        from = "Column::PrestataireId",
        to = "super::prestataires::Column::Id"
    )]
    Prestataire,

    #[sea_orm(has_many = "super::reservations::Entity")]
    Reservation,

    #[sea_orm(has_many = "super::avis::Entity")]
    Avis,

    #[sea_orm(has_many = "super::favoris::Entity")]
    Favori,
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

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn offre(somme: i64, nombre: i32) -> Model {
        Model {
            id: 1,
            prestataire_id: 1,
            titre: "Randonnée chameau".to_string(),
            description: None,
            prix: Decimal::from(100),
            categorie: "AVENTURE".to_string(),
            region: "Sud".to_string(),
            est_active: true,
            est_en_vedette: false,
            vedette_jusqua: None,
            somme_notes: somme,
            nombre_avis: nombre,
            created_at: None,
        }
    }

    #[test]
    fn test_note_moyenne_sans_avis() {
        assert_eq!(offre(0, 0).note_moyenne(), 0.0);
    }

    #[test]
    fn test_note_moyenne_derivee_de_l_agregat() {
        // 4 + 5 + 3 = 12 sur 3 avis
        assert_eq!(offre(12, 3).note_moyenne(), 4.0);
    }
}
