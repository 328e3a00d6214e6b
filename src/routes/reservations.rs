use actix_web::{get, post, put, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder};
use serde::Deserialize;
use chrono::NaiveDate;

use crate::middleware::AuthUser;
use crate::models::enums::Role;
use crate::models::reservations;
use crate::services::auth_service::AuthService;
use crate::services::reservation_service::ReservationService;

// DTO pour créer une réservation
#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub offre_id: i32,
    pub date_debut: NaiveDate,
    pub date_fin: Option<NaiveDate>, // absent = activité d'une journée
    pub nombre_personnes: i32,
}

/// POST /api/reservations - Réserver une offre (USER)
#[post("")]
pub async fn create_reservation(
    auth_user: AuthUser,
    body: web::Json<CreateReservationRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::User).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    match ReservationService::creer(
        db.get_ref(),
        &user,
        body.offre_id,
        body.date_debut,
        body.date_fin,
        body.nombre_personnes,
    )
    .await
    {
        Ok(reservation) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "data": reservation
        })),
        Err(e) => e.en_reponse(),
    }
}

/// GET /api/reservations/mes - Mes réservations (USER)
#[get("/mes")]
pub async fn mes_reservations(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::User).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let liste = reservations::Entity::find()
        .filter(reservations::Column::UserId.eq(user.id))
        .order_by_desc(reservations::Column::DateDebut)
        .order_by_desc(reservations::Column::Id)
        .all(db.get_ref())
        .await;

    match liste {
        Ok(liste) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": liste
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch reservations: {}", e)
        })),
    }
}

/// GET /api/reservations/prestataire - Réservations reçues (PRESTATAIRE)
#[get("/prestataire")]
pub async fn reservations_prestataire(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    let liste = reservations::Entity::find()
        .filter(reservations::Column::PrestataireId.eq(profil.id))
        .order_by_desc(reservations::Column::DateDebut)
        .order_by_desc(reservations::Column::Id)
        .all(db.get_ref())
        .await;

    match liste {
        Ok(liste) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": liste
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch reservations: {}", e)
        })),
    }
}

/// PUT /api/reservations/{id}/annuler - Annuler (voyageur ou admin, depuis PENDING)
#[put("/{id}/annuler")]
pub async fn annuler_reservation(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::resolve_user(db.get_ref(), &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    match ReservationService::annuler(db.get_ref(), &user, path.into_inner()).await {
        Ok(reservation) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": reservation
        })),
        Err(e) => e.en_reponse(),
    }
}

/// PUT /api/reservations/{id}/confirmer - Confirmer sans paiement
/// (prestataire propriétaire ou admin; le chemin normal est le paiement)
#[put("/{id}/confirmer")]
pub async fn confirmer_reservation(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (user, profil_id) = match identite_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(reponse) => return reponse,
    };

    match ReservationService::confirmer(db.get_ref(), &user, profil_id, path.into_inner()).await {
        Ok(reservation) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": reservation
        })),
        Err(e) => e.en_reponse(),
    }
}

/// PUT /api/reservations/{id}/terminer - Clôturer une réservation confirmée
/// (prestataire propriétaire ou admin)
#[put("/{id}/terminer")]
pub async fn terminer_reservation(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (user, profil_id) = match identite_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(reponse) => return reponse,
    };

    match ReservationService::terminer(db.get_ref(), &user, profil_id, path.into_inner()).await {
        Ok(reservation) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": reservation
        })),
        Err(e) => e.en_reponse(),
    }
}

// Identité prestataire (ou admin sans profil) pour les transitions
async fn identite_prestataire(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
) -> Result<(crate::models::users::Model, Option<i32>), HttpResponse> {
    let user = match AuthService::require_role(db, auth_user, Role::Prestataire).await {
        Ok(user) => user,
        Err(e) => return Err(e.en_reponse()),
    };

    let profil_id = match AuthService::profil_optionnel(db, &user).await {
        Ok(profil_id) => profil_id,
        Err(e) => return Err(e.en_reponse()),
    };

    Ok((user, profil_id))
}

pub fn reservations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reservations")
            .service(create_reservation)
            .service(mes_reservations)
            .service(reservations_prestataire)
            .service(annuler_reservation)
            .service(confirmer_reservation)
            .service(terminer_reservation)
    );
}
