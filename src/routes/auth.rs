use actix_web::{post, get, web, HttpResponse};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::{PlanAbonnement, Role};
use crate::models::{prestataires, users};
use crate::utils::{password, jwt};
use crate::middleware::AuthUser;
use crate::services::auth_service::AuthService;
use crate::services::parrainage_service::ParrainageService;

// DTO pour l'inscription
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nom: Option<String>,
    pub role: Role,
    // Champs prestataire
    pub nom_entreprise: Option<String>,
    pub code_parrainage: Option<String>,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    // Le même email peut détenir un compte par rôle
    pub role: Role,
}

// DTO pour la connexion Google
#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    pub id_token: String,
    pub role: Role,
}

// DTO pour changer le mot de passe
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// Réponse après login/register
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

/// POST /auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Le rôle ADMIN ne s'obtient jamais par inscription
    if body.role == Role::Admin {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Rôle d'inscription invalide"
        }));
    }

    if body.role == Role::Prestataire && body.nom_entreprise.is_none() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "nom_entreprise est requis pour un compte prestataire"
        }));
    }

    // 2. Vérifier si le couple (email, rôle) existe déjà
    let existing_user = users::Entity::find()
        .filter(users::Column::Email.eq(&body.email))
        .filter(users::Column::Role.eq(body.role))
        .one(db.get_ref())
        .await;

    match existing_user {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "success": false,
                "error": "Un compte existe déjà pour cet email et ce rôle"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 3. Hash le mot de passe
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    // 4. Créer le compte
    let new_user = users::ActiveModel {
        email: Set(body.email.clone()),
        nom: Set(body.nom.clone()),
        password_hash: Set(Some(password_hash)),
        role: Set(body.role),
        google_id: Set(None),
        est_suspendu: Set(false),
        ..Default::default()
    };

    let user = match new_user.insert(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to create user: {}", e)
            }));
        }
    };

    // 5. Profil prestataire + parrainage éventuel
    if body.role == Role::Prestataire {
        let nom_entreprise = body.nom_entreprise.clone().unwrap_or_default();
        let profil = match creer_profil_prestataire(db.get_ref(), user.id, &nom_entreprise).await {
            Ok(profil) => profil,
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "error": format!("Failed to create provider profile: {}", e)
                }));
            }
        };

        if let Some(code) = &body.code_parrainage {
            // Un code invalide n'annule pas l'inscription déjà faite
            if let Err(e) = ParrainageService::creer_depuis_code(db.get_ref(), code, profil.id).await
            {
                eprintln!("⚠️  Referral code rejected at signup: {}", e);
            }
        }
    }

    // 6. Générer le JWT
    let token = match jwt::generate_token(user.id, &body.email, body.role) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    // 7. Retourner la réponse
    HttpResponse::Created().json(AuthResponse {
        token,
        user_id: user.id,
        email: body.email.clone(),
        role: body.role,
    })
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Trouver le compte (email, rôle)
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(&body.email))
        .filter(users::Column::Role.eq(body.role))
        .one(db.get_ref())
        .await;

    let user = match user {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "Email ou mot de passe invalide"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Un compte suspendu ne se connecte pas
    if user.est_suspendu {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": "Ce compte est suspendu"
        }));
    }

    // 3. Vérifier le mot de passe
    let password_hash = match user.password_hash {
        Some(ref hash) => hash,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "Email ou mot de passe invalide"
            }));
        }
    };

    let is_valid = match password::verify_password(&body.password, password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Password verification error: {}", e)
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": "Email ou mot de passe invalide"
        }));
    }

    // 4. Générer le JWT
    let token = match jwt::generate_token(user.id, &user.email, user.role) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    // 5. Retourner la réponse
    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

/// POST /auth/google - Se connecter via un ID token Google (PUBLIC)
/// Le token est validé auprès de l'endpoint tokeninfo de Google, puis le
/// compte local est créé au premier passage et une session JWT est émise.
#[post("/google")]
pub async fn google_login(
    body: web::Json<GoogleLoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if body.role == Role::Admin {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Rôle d'inscription invalide"
        }));
    }

    // 1. Valider le token auprès de Google
    let infos = match verifier_token_google(&body.id_token).await {
        Ok(infos) => infos,
        Err(e) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": format!("Invalid Google token: {}", e)
            }));
        }
    };

    // 2. Retrouver ou créer le compte (email, rôle)
    let existant = users::Entity::find()
        .filter(users::Column::Email.eq(&infos.email))
        .filter(users::Column::Role.eq(body.role))
        .one(db.get_ref())
        .await;

    let user = match existant {
        Ok(Some(user)) => {
            if user.est_suspendu {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "success": false,
                    "error": "Ce compte est suspendu"
                }));
            }
            user
        }
        Ok(None) => {
            let new_user = users::ActiveModel {
                email: Set(infos.email.clone()),
                nom: Set(infos.nom.clone()),
                password_hash: Set(None),
                role: Set(body.role),
                google_id: Set(Some(infos.google_id.clone())),
                est_suspendu: Set(false),
                ..Default::default()
            };

            let user = match new_user.insert(db.get_ref()).await {
                Ok(user) => user,
                Err(e) => {
                    return HttpResponse::InternalServerError().json(serde_json::json!({
                        "success": false,
                        "error": format!("Failed to create user: {}", e)
                    }));
                }
            };

            if body.role == Role::Prestataire {
                let nom_entreprise = infos.nom.clone().unwrap_or_else(|| infos.email.clone());
                if let Err(e) =
                    creer_profil_prestataire(db.get_ref(), user.id, &nom_entreprise).await
                {
                    return HttpResponse::InternalServerError().json(serde_json::json!({
                        "success": false,
                        "error": format!("Failed to create provider profile: {}", e)
                    }));
                }
            }

            user
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 3. Émettre la session locale
    let token = match jwt::generate_token(user.id, &user.email, user.role) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

/// GET /auth/me - Identité courante résolue en BD (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match AuthService::resolve_user(db.get_ref(), &auth_user).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": user
        })),
        Err(e) => e.en_reponse(),
    }
}

/// POST /auth/change-password - Changer son mot de passe (PROTÉGÉE)
#[post("/change-password")]
pub async fn change_password(
    auth_user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Récupérer le compte
    let user = match AuthService::resolve_user(db.get_ref(), &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    // 2. Vérifier l'ancien mot de passe
    let current_password_hash = match user.password_hash {
        Some(ref hash) => hash.clone(),
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "Ce compte utilise la connexion Google"
            }));
        }
    };

    let is_valid = match password::verify_password(&body.current_password, &current_password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Password verification error: {}", e)
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": "Mot de passe actuel incorrect"
        }));
    }

    // 3. Hasher le nouveau mot de passe
    let new_password_hash = match password::hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    // 4. Mettre à jour le mot de passe dans la BD
    let mut active_model: users::ActiveModel = user.into();
    active_model.password_hash = Set(Some(new_password_hash));

    match active_model.update(db.get_ref()).await {
        Ok(_) => {
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Mot de passe modifié"
            }))
        }
        Err(e) => {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to update password: {}", e)
            }))
        }
    }
}

/// Profil prestataire: vérifié d'office, plan GRATUIT, code de parrainage
/// unique dérivé d'un UUID v4
async fn creer_profil_prestataire(
    db: &DatabaseConnection,
    user_id: i32,
    nom_entreprise: &str,
) -> Result<prestataires::Model, DbErr> {
    let code = format!(
        "PAR-{}",
        Uuid::new_v4().simple().to_string()[..8].to_uppercase()
    );

    let profil = prestataires::ActiveModel {
        user_id: Set(user_id),
        nom_entreprise: Set(nom_entreprise.to_string()),
        description: Set(None),
        telephone: Set(None),
        region: Set(None),
        est_verifie: Set(true),
        plan: Set(PlanAbonnement::Gratuit),
        code_parrainage: Set(code),
        points_parrainage: Set(0),
        stripe_account_id: Set(None),
        ..Default::default()
    };

    profil.insert(db).await
}

// Infos extraites de la réponse tokeninfo de Google
struct InfosGoogle {
    email: String,
    nom: Option<String>,
    google_id: String,
}

/// Valide un ID token auprès de Google et vérifie l'audience
async fn verifier_token_google(id_token: &str) -> Result<InfosGoogle, String> {
    let client_id = std::env::var("GOOGLE_CLIENT_ID")
        .map_err(|_| "GOOGLE_CLIENT_ID not configured".to_string())?;

    let response = reqwest::Client::new()
        .get("https://oauth2.googleapis.com/tokeninfo")
        .query(&[("id_token", id_token)])
        .send()
        .await
        .map_err(|e| format!("Google request failed: {}", e))?;

    if !response.status().is_success() {
        return Err("Token rejected by Google".to_string());
    }

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Google response decode failed: {}", e))?;

    if body["aud"].as_str() != Some(client_id.as_str()) {
        return Err("Token audience mismatch".to_string());
    }

    let email = body["email"]
        .as_str()
        .ok_or("Token has no email")?
        .to_string();
    let google_id = body["sub"]
        .as_str()
        .ok_or("Token has no subject")?
        .to_string();
    let nom = body["name"].as_str().map(|s| s.to_string());

    Ok(InfosGoogle {
        email,
        nom,
        google_id,
    })
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(google_login)
            .service(me)
            .service(change_password)
    );
}
