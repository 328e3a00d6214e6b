use actix_web::{get, post, put, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder, Set, ActiveModelTrait};
use serde::Deserialize;
use validator::Validate;
use chrono::{Duration, Utc};

use crate::middleware::AuthUser;
use crate::models::enums::{Role, TypeBoost};
use crate::models::{boosts, offres};
use crate::services::auth_service::AuthService;

// DTO pour créer un boost
#[derive(Deserialize, Validate)]
pub struct CreateBoostRequest {
    #[serde(rename = "type")]
    pub type_boost: TypeBoost,
    // Portée optionnelle: une offre, une région ou une catégorie
    pub offre_id: Option<i32>,
    pub region: Option<String>,
    pub categorie: Option<String>,
    #[validate(range(min = 1, max = 90))]
    pub duree_jours: i64,
}

/// POST /api/boosts - Activer un boost (PRESTATAIRE)
#[post("")]
pub async fn create_boost(
    auth_user: AuthUser,
    body: web::Json<CreateBoostRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    // Une offre ciblée doit appartenir au prestataire
    if let Some(offre_id) = body.offre_id {
        let offre = match offres::Entity::find_by_id(offre_id).one(db.get_ref()).await {
            Ok(Some(offre)) => offre,
            Ok(None) => {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "error": "Offre introuvable"
                }));
            }
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "error": format!("Database error: {}", e)
                }));
            }
        };

        if offre.prestataire_id != profil.id {
            return HttpResponse::Forbidden().json(serde_json::json!({
                "success": false,
                "error": "Cette offre ne vous appartient pas"
            }));
        }
    }

    let maintenant = Utc::now().naive_utc();

    let nouveau = boosts::ActiveModel {
        prestataire_id: Set(profil.id),
        offre_id: Set(body.offre_id),
        region: Set(body.region.clone()),
        categorie: Set(body.categorie.clone()),
        type_boost: Set(body.type_boost),
        date_debut: Set(maintenant),
        date_fin: Set(maintenant + Duration::days(body.duree_jours)),
        est_actif: Set(true),
        ..Default::default()
    };

    match nouveau.insert(db.get_ref()).await {
        Ok(boost) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "data": boost
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to create boost: {}", e)
        })),
    }
}

/// GET /api/boosts/mes - Mes boosts (PRESTATAIRE)
#[get("/mes")]
pub async fn mes_boosts(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let liste = boosts::Entity::find()
        .filter(boosts::Column::PrestataireId.eq(profil.id))
        .order_by_desc(boosts::Column::DateFin)
        .all(db.get_ref())
        .await;

    match liste {
        Ok(liste) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": liste
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch boosts: {}", e)
        })),
    }
}

/// PUT /api/boosts/{id}/desactiver - Retirer un boost avant son échéance
/// (propriétaire ou admin)
#[put("/{id}/desactiver")]
pub async fn desactiver_boost(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::Prestataire).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let profil_id = match AuthService::profil_optionnel(db.get_ref(), &user).await {
        Ok(profil_id) => profil_id,
        Err(e) => return e.en_reponse(),
    };

    let boost = match boosts::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(boost)) => boost,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Boost introuvable"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            }));
        }
    };

    let autorise = user.role == Role::Admin || profil_id == Some(boost.prestataire_id);
    if !autorise {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Accès interdit"
        }));
    }

    let mut active: boosts::ActiveModel = boost.into();
    active.est_actif = Set(false);

    match active.update(db.get_ref()).await {
        Ok(boost) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": boost
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to update boost: {}", e)
        })),
    }
}

pub fn boosts_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/boosts")
            .service(create_boost)
            .service(mes_boosts)
            .service(desactiver_boost)
    );
}
