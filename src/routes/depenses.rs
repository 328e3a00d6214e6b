use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder, Set, ActiveModelTrait};
use serde::Deserialize;
use validator::Validate;
use rust_decimal::Decimal;
use chrono::NaiveDate;

use crate::middleware::AuthUser;
use crate::models::depenses;
use crate::models::enums::Role;
use crate::services::auth_service::AuthService;

// DTO pour enregistrer une dépense
#[derive(Deserialize, Validate)]
pub struct CreateDepenseRequest {
    #[validate(length(min = 1, max = 150))]
    pub libelle: String,
    pub montant: Decimal,
    pub categorie: Option<String>,
    pub date_depense: NaiveDate,
}

/// POST /api/depenses - Enregistrer une dépense (PRESTATAIRE)
#[post("")]
pub async fn create_depense(
    auth_user: AuthUser,
    body: web::Json<CreateDepenseRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    if body.montant <= Decimal::ZERO {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Le montant doit être supérieur à 0"
        }));
    }

    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let nouvelle = depenses::ActiveModel {
        prestataire_id: Set(profil.id),
        libelle: Set(body.libelle.clone()),
        montant: Set(body.montant),
        categorie: Set(body.categorie.clone()),
        date_depense: Set(body.date_depense),
        ..Default::default()
    };

    match nouvelle.insert(db.get_ref()).await {
        Ok(depense) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "data": depense
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to create expense: {}", e)
        })),
    }
}

/// GET /api/depenses - Mes dépenses (PRESTATAIRE)
#[get("")]
pub async fn mes_depenses(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let liste = depenses::Entity::find()
        .filter(depenses::Column::PrestataireId.eq(profil.id))
        .order_by_desc(depenses::Column::DateDepense)
        .order_by_desc(depenses::Column::Id)
        .all(db.get_ref())
        .await;

    match liste {
        Ok(liste) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": liste
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch expenses: {}", e)
        })),
    }
}

/// DELETE /api/depenses/{id} - Supprimer une dépense (propriétaire ou admin)
#[delete("/{id}")]
pub async fn delete_depense(
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

    let depense = match depenses::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(depense)) => depense,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Dépense introuvable"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            }));
        }
    };

    let autorise = user.role == Role::Admin || profil_id == Some(depense.prestataire_id);
    if !autorise {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Accès interdit"
        }));
    }

    match depenses::Entity::delete_by_id(depense.id).exec(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Dépense supprimée"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to delete expense: {}", e)
        })),
    }
}

pub fn depenses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/depenses")
            .service(create_depense)
            .service(mes_depenses)
            .service(delete_depense)
    );
}
