use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder};
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::dto::ParrainageStats;
use crate::models::enums::StatutParrainage;
use crate::models::parrainages;
use crate::services::auth_service::AuthService;
use crate::services::parrainage_service::ParrainageService;

// DTO pour la conversion de points
#[derive(Deserialize)]
pub struct ConvertirPointsRequest {
    pub points: i32,
}

/// GET /api/parrainages/code - Mon code à partager (PRESTATAIRE)
#[get("/code")]
pub async fn mon_code(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": {
            "code_parrainage": profil.code_parrainage,
            "points_parrainage": profil.points_parrainage
        }
    }))
}

/// GET /api/parrainages/mes - Mes filleuls et mes statistiques (PRESTATAIRE)
#[get("/mes")]
pub async fn mes_parrainages(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let liste = match parrainages::Entity::find()
        .filter(parrainages::Column::ParrainId.eq(profil.id))
        .order_by_desc(parrainages::Column::Id)
        .all(db.get_ref())
        .await
    {
        Ok(liste) => liste,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to fetch referrals: {}", e)
            }));
        }
    };

    let stats = ParrainageStats {
        total_parrainages: liste.len() as u64,
        parrainages_completes: liste
            .iter()
            .filter(|p| p.statut == StatutParrainage::Complete)
            .count() as u64,
        total_points_gagnes: liste.iter().map(|p| p.points_gagnes as i64).sum(),
        points_disponibles: profil.points_parrainage,
    };

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": {
            "parrainages": liste,
            "stats": stats
        }
    }))
}

/// POST /api/parrainages/convertir - Convertir des points en boost
/// Multiple exact et positif de 100 points, dans la limite du solde.
#[post("/convertir")]
pub async fn convertir_points(
    auth_user: AuthUser,
    body: web::Json<ConvertirPointsRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    match ParrainageService::convertir_points(db.get_ref(), &profil, body.points).await {
        Ok(boost) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "message": format!("{} points convertis", body.points),
            "data": boost
        })),
        Err(e) => e.en_reponse(),
    }
}

pub fn parrainages_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/parrainages")
            .service(mon_code)
            .service(mes_parrainages)
            .service(convertir_points)
    );
}
