use sea_orm::*;

use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::models::enums::Role;
use crate::models::{prestataires, users};

pub struct AuthService;

impl AuthService {
    /// Résout l'identité vérifiée (claims JWT) en compte BD.
    /// Échec fermé: compte absent ou suspendu → NonAutorise.
    pub async fn resolve_user(
        db: &DatabaseConnection,
        auth: &AuthUser,
    ) -> Result<users::Model, ApiError> {
        let user = users::Entity::find_by_id(auth.user_id)
            .one(db)
            .await?
            .ok_or(ApiError::NonAutorise)?;

        if user.est_suspendu {
            return Err(ApiError::NonAutorise);
        }

        Ok(user)
    }

    /// Porte d'autorisation: identité résolue + rôle requis.
    /// Le rôle vérifié est celui stocké en BD, pas celui des claims.
    /// ADMIN satisfait toutes les exigences.
    pub async fn require_role(
        db: &DatabaseConnection,
        auth: &AuthUser,
        requis: Role,
    ) -> Result<users::Model, ApiError> {
        let user = Self::resolve_user(db, auth).await?;

        if !user.role.permet(requis) {
            return Err(ApiError::Interdit);
        }

        Ok(user)
    }

    /// Variante prestataire: résout aussi le profil 1:1.
    /// Un ADMIN sans profil prestataire est refusé ici car ces endpoints
    /// opèrent sur les données "de son propre profil".
    pub async fn require_prestataire(
        db: &DatabaseConnection,
        auth: &AuthUser,
    ) -> Result<(users::Model, prestataires::Model), ApiError> {
        let user = Self::require_role(db, auth, Role::Prestataire).await?;

        let profil = prestataires::Entity::find()
            .filter(prestataires::Column::UserId.eq(user.id))
            .one(db)
            .await?
            .ok_or(ApiError::Interdit)?;

        Ok((user, profil))
    }

    /// Pour les endpoints prestataire qui tolèrent l'override admin:
    /// None pour un admin (pas de profil à comparer), Some(id du profil)
    /// pour un prestataire.
    pub async fn profil_optionnel(
        db: &DatabaseConnection,
        user: &users::Model,
    ) -> Result<Option<i32>, ApiError> {
        if user.role == Role::Admin {
            return Ok(None);
        }

        let profil = prestataires::Entity::find()
            .filter(prestataires::Column::UserId.eq(user.id))
            .one(db)
            .await?
            .ok_or(ApiError::Interdit)?;

        Ok(Some(profil.id))
    }

    /// Vérification de propriété: accès accordé au propriétaire de la
    /// ressource ou à un admin.
    pub fn est_proprietaire_ou_admin(user: &users::Model, proprietaire_id: i32) -> bool {
        user.role == Role::Admin || user.id == proprietaire_id
    }
}
