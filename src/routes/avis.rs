use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::avis;
use crate::models::enums::Role;
use crate::services::auth_service::AuthService;
use crate::services::avis_service::AvisService;

// DTO pour déposer un avis
#[derive(Deserialize, Validate)]
pub struct CreateAvisRequest {
    pub offre_id: i32,
    #[validate(range(min = 1, max = 5))]
    pub note: i32,
    pub commentaire: Option<String>,
}

/// POST /api/avis - Déposer un avis (USER, un seul par offre)
#[post("")]
pub async fn create_avis(
    auth_user: AuthUser,
    body: web::Json<CreateAvisRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::User).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    match AvisService::ajouter_avis(
        db.get_ref(),
        &user,
        body.offre_id,
        body.note,
        body.commentaire.clone(),
    )
    .await
    {
        Ok(avis) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "data": avis
        })),
        Err(e) => e.en_reponse(),
    }
}

/// GET /api/avis/offre/{id} - Avis d'une offre (PUBLIC)
#[get("/offre/{id}")]
pub async fn avis_offre(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let liste = avis::Entity::find()
        .filter(avis::Column::OffreId.eq(path.into_inner()))
        .order_by_desc(avis::Column::Id)
        .all(db.get_ref())
        .await;

    match liste {
        Ok(liste) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": liste
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch reviews: {}", e)
        })),
    }
}

pub fn avis_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/avis")
            .service(create_avis)
            .service(avis_offre)
    );
}
