use actix_web::HttpResponse;
use sea_orm::{DbErr, SqlErr};

/// Erreurs métier de l'API.
/// Les services retournent `Result<T, ApiError>` et les routes traduisent
/// via `en_reponse()` vers le code HTTP + l'enveloppe JSON uniforme
/// {success, data?, message?, error?}.
#[derive(Debug)]
pub enum ApiError {
    /// Champ manquant ou invalide → 400
    Validation(String),
    /// Pas d'identité vérifiée → 401
    NonAutorise,
    /// Identité vérifiée mais rôle/propriété insuffisants → 403
    Interdit,
    /// Ressource inexistante → 404
    Introuvable(String),
    /// Contrainte d'unicité violée → 409
    Conflit(String),
    /// Erreur base de données → 500
    BaseDeDonnees(DbErr),
    /// Erreur d'un collaborateur externe (Stripe, Google) → 500
    Externe(String),
}

impl ApiError {
    /// Traducteur central erreur métier → réponse HTTP
    pub fn en_reponse(&self) -> HttpResponse {
        match self {
            ApiError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": msg
            })),
            ApiError::NonAutorise => HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "Non autorisé"
            })),
            ApiError::Interdit => HttpResponse::Forbidden().json(serde_json::json!({
                "success": false,
                "error": "Accès interdit"
            })),
            ApiError::Introuvable(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": msg
            })),
            ApiError::Conflit(msg) => HttpResponse::Conflict().json(serde_json::json!({
                "success": false,
                "error": msg
            })),
            ApiError::BaseDeDonnees(e) => {
                eprintln!("⚠️  Database error: {}", e);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "error": "Erreur interne du serveur"
                }))
            }
            ApiError::Externe(msg) => {
                eprintln!("⚠️  External service error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "error": "Erreur interne du serveur"
                }))
            }
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        // Une violation d'unicité remonte en 409 plutôt qu'en 500
        if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
            return ApiError::Conflit("Cette ressource existe déjà".to_string());
        }
        ApiError::BaseDeDonnees(e)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation: {}", msg),
            ApiError::NonAutorise => write!(f, "Non autorisé"),
            ApiError::Interdit => write!(f, "Accès interdit"),
            ApiError::Introuvable(msg) => write!(f, "Introuvable: {}", msg),
            ApiError::Conflit(msg) => write!(f, "Conflit: {}", msg),
            ApiError::BaseDeDonnees(e) => write!(f, "Erreur BD: {}", e),
            ApiError::Externe(msg) => write!(f, "Erreur externe: {}", msg),
        }
    }
}
