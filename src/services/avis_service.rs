use sea_orm::*;
use sea_orm::sea_query::Expr;

use crate::errors::ApiError;
use crate::models::{avis, offres, users};

pub struct AvisService;

impl AvisService {
    pub fn valider_note(note: i32) -> Result<(), String> {
        if (1..=5).contains(&note) {
            Ok(())
        } else {
            Err("La note doit être comprise entre 1 et 5".to_string())
        }
    }

    /// Insère l'avis puis met à jour l'agrégat de l'offre par incréments
    /// atomiques côté BD (somme_notes += note, nombre_avis += 1) dans la
    /// même transaction: jamais de relecture de tous les avis.
    pub async fn ajouter_avis(
        db: &DatabaseConnection,
        user: &users::Model,
        offre_id: i32,
        note: i32,
        commentaire: Option<String>,
    ) -> Result<avis::Model, ApiError> {
        Self::valider_note(note).map_err(ApiError::Validation)?;

        offres::Entity::find_by_id(offre_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Introuvable("Offre introuvable".to_string()))?;

        let existant = avis::Entity::find()
            .filter(avis::Column::UserId.eq(user.id))
            .filter(avis::Column::OffreId.eq(offre_id))
            .one(db)
            .await?;

        if existant.is_some() {
            return Err(ApiError::Conflit(
                "Vous avez déjà laissé un avis pour cette offre".to_string(),
            ));
        }

        let txn = db.begin().await?;

        let nouvel_avis = avis::ActiveModel {
            user_id: Set(user.id),
            offre_id: Set(offre_id),
            note: Set(note),
            commentaire: Set(commentaire),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        offres::Entity::update_many()
            .col_expr(
                offres::Column::SommeNotes,
                Expr::col(offres::Column::SommeNotes).add(note as i64),
            )
            .col_expr(
                offres::Column::NombreAvis,
                Expr::col(offres::Column::NombreAvis).add(1),
            )
            .filter(offres::Column::Id.eq(offre_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(nouvel_avis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_entre_1_et_5() {
        assert!(AvisService::valider_note(1).is_ok());
        assert!(AvisService::valider_note(5).is_ok());
        assert!(AvisService::valider_note(0).is_err());
        assert!(AvisService::valider_note(6).is_err());
    }
}
