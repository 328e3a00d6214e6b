use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder, Set, ActiveModelTrait};

use crate::middleware::AuthUser;
use crate::models::enums::Role;
use crate::models::{favoris, offres};
use crate::services::auth_service::AuthService;

/// POST /api/favoris/{offre_id} - Ajouter une offre aux favoris (USER)
#[post("/{offre_id}")]
pub async fn ajouter_favori(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::User).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let offre_id = path.into_inner();

    // L'offre doit exister
    match offres::Entity::find_by_id(offre_id).one(db.get_ref()).await {
        Ok(Some(_)) => {}
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
    }

    // Déjà en favori → 409
    let existant = favoris::Entity::find()
        .filter(favoris::Column::UserId.eq(user.id))
        .filter(favoris::Column::OffreId.eq(offre_id))
        .one(db.get_ref())
        .await;

    match existant {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "success": false,
                "error": "Cette offre est déjà dans vos favoris"
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

    let nouveau = favoris::ActiveModel {
        user_id: Set(user.id),
        offre_id: Set(offre_id),
        ..Default::default()
    };

    match nouveau.insert(db.get_ref()).await {
        Ok(favori) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "data": favori
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to add favorite: {}", e)
        })),
    }
}

/// DELETE /api/favoris/{offre_id} - Retirer une offre des favoris (USER)
#[delete("/{offre_id}")]
pub async fn retirer_favori(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::User).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let resultat = favoris::Entity::delete_many()
        .filter(favoris::Column::UserId.eq(user.id))
        .filter(favoris::Column::OffreId.eq(path.into_inner()))
        .exec(db.get_ref())
        .await;

    match resultat {
        Ok(resultat) if resultat.rows_affected > 0 => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Favori retiré"
        })),
        Ok(_) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "Favori introuvable"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to remove favorite: {}", e)
        })),
    }
}

/// GET /api/favoris - Mes favoris avec les offres associées (USER)
#[get("")]
pub async fn mes_favoris(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::User).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let liste = favoris::Entity::find()
        .filter(favoris::Column::UserId.eq(user.id))
        .order_by_desc(favoris::Column::Id)
        .find_also_related(offres::Entity)
        .all(db.get_ref())
        .await;

    match liste {
        Ok(liste) => {
            let response: Vec<serde_json::Value> = liste
                .into_iter()
                .map(|(favori, offre)| {
                    serde_json::json!({
                        "favori": favori,
                        "offre": offre
                    })
                })
                .collect();

            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "data": response
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch favorites: {}", e)
        })),
    }
}

pub fn favoris_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favoris")
            .service(mes_favoris)
            .service(ajouter_favori)
            .service(retirer_favori)
    );
}
