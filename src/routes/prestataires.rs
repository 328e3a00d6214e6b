use actix_web::{get, post, put, web, HttpResponse};
use sea_orm::{DatabaseConnection, Set, ActiveModelTrait};
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::enums::{PlanAbonnement, TypeEvenementParrainage};
use crate::models::prestataires;
use crate::services::auth_service::AuthService;
use crate::services::parrainage_service::ParrainageService;
use crate::services::stripe_service::{FournisseurPaiement, StripeClient};

// DTO pour la mise à jour du profil
#[derive(Deserialize)]
pub struct UpdateProfilRequest {
    pub nom_entreprise: Option<String>,
    pub description: Option<String>,
    pub telephone: Option<String>,
    pub region: Option<String>,
}

// DTO pour le changement de plan
#[derive(Deserialize)]
pub struct AbonnementRequest {
    pub plan: PlanAbonnement,
}

/// GET /api/prestataires/profil - Mon profil (PRESTATAIRE)
#[get("/profil")]
pub async fn mon_profil(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok((_, profil)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": profil
        })),
        Err(e) => e.en_reponse(),
    }
}

/// PUT /api/prestataires/profil - Modifier mon profil (PRESTATAIRE)
#[put("/profil")]
pub async fn modifier_profil(
    auth_user: AuthUser,
    body: web::Json<UpdateProfilRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let mut active: prestataires::ActiveModel = profil.into();
    if let Some(nom_entreprise) = &body.nom_entreprise {
        active.nom_entreprise = Set(nom_entreprise.clone());
    }
    if let Some(description) = &body.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(telephone) = &body.telephone {
        active.telephone = Set(Some(telephone.clone()));
    }
    if let Some(region) = &body.region {
        active.region = Set(Some(region.clone()));
    }

    match active.update(db.get_ref()).await {
        Ok(profil) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": profil
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to update profile: {}", e)
        })),
    }
}

/// POST /api/prestataires/abonnement - Changer de plan (PRESTATAIRE)
/// Le passage à PREMIUM crédite l'événement de parrainage du filleul.
#[post("/abonnement")]
pub async fn changer_abonnement(
    auth_user: AuthUser,
    body: web::Json<AbonnementRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let profil_id = profil.id;
    let mut active: prestataires::ActiveModel = profil.into();
    active.plan = Set(body.plan);

    let profil = match active.update(db.get_ref()).await {
        Ok(profil) => profil,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to update plan: {}", e)
            }));
        }
    };

    if body.plan == PlanAbonnement::Premium {
        if let Err(e) = ParrainageService::crediter_pour_filleul(
            db.get_ref(),
            profil_id,
            TypeEvenementParrainage::AbonnementPremium,
        )
        .await
        {
            eprintln!("⚠️  Referral credit failed: {}", e);
        }
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": profil
    }))
}

/// POST /api/prestataires/stripe/onboarding - Lien d'onboarding Stripe
/// Crée le compte connecté au premier appel puis retourne un lien
/// d'onboarding (réutilisable tant que l'onboarding n'est pas terminé).
#[post("/stripe/onboarding")]
pub async fn stripe_onboarding(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    stripe: web::Data<StripeClient>,
) -> HttpResponse {
    let (user, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let account_id = match &profil.stripe_account_id {
        Some(account_id) => account_id.clone(),
        None => {
            let account_id = match stripe.creer_compte_connecte(&user.email).await {
                Ok(account_id) => account_id,
                Err(e) => {
                    eprintln!("⚠️  Stripe account creation failed: {}", e);
                    return HttpResponse::InternalServerError().json(serde_json::json!({
                        "success": false,
                        "error": "Impossible de créer le compte de paiement"
                    }));
                }
            };

            let mut active: prestataires::ActiveModel = profil.into();
            active.stripe_account_id = Set(Some(account_id.clone()));
            if let Err(e) = active.update(db.get_ref()).await {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "error": format!("Failed to save account id: {}", e)
                }));
            }

            account_id
        }
    };

    match stripe.creer_lien_onboarding(&account_id).await {
        Ok(url) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": { "url": url }
        })),
        Err(e) => {
            eprintln!("⚠️  Stripe onboarding link failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Impossible de créer le lien d'onboarding"
            }))
        }
    }
}

/// GET /api/prestataires/stripe/statut - État du compte connecté
#[get("/stripe/statut")]
pub async fn stripe_statut(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    stripe: web::Data<StripeClient>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let account_id = match &profil.stripe_account_id {
        Some(account_id) => account_id,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "Aucun compte de paiement lié"
            }));
        }
    };

    match stripe.statut_compte(account_id).await {
        Ok(etat) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": {
                "account_id": etat.id,
                "charges_enabled": etat.charges_enabled,
                "payouts_enabled": etat.payouts_enabled
            }
        })),
        Err(e) => {
            eprintln!("⚠️  Stripe account status failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Impossible de récupérer l'état du compte"
            }))
        }
    }
}

pub fn prestataires_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prestataires")
            .service(mon_profil)
            .service(modifier_profil)
            .service(changer_abonnement)
            .service(stripe_onboarding)
            .service(stripe_statut)
    );
}
