use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::enums::Role;
use crate::models::reservations;
use crate::services::auth_service::AuthService;
use crate::services::paiement_service::PaiementService;
use crate::services::stripe_service::StripeClient;

// DTO commun aux deux chemins de paiement
#[derive(Deserialize)]
pub struct PaiementRequest {
    pub reservation_id: i32,
}

/// POST /api/paiements/cash - Enregistrer un paiement en espèces
/// Réservé au voyageur qui a réservé (ou admin); la réservation passe
/// immédiatement à CONFIRMED.
#[post("/cash")]
pub async fn paiement_cash(
    auth_user: AuthUser,
    body: web::Json<PaiementRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::User).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    match PaiementService::enregistrer_cash(db.get_ref(), &user, body.reservation_id).await {
        Ok(paiement) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "data": paiement
        })),
        Err(e) => e.en_reponse(),
    }
}

/// POST /api/paiements/intention - Créer une intention de paiement Stripe
/// Retourne le client_secret; la confirmation arrivera par webhook.
#[post("/intention")]
pub async fn creer_intention(
    auth_user: AuthUser,
    body: web::Json<PaiementRequest>,
    db: web::Data<DatabaseConnection>,
    stripe: web::Data<StripeClient>,
) -> HttpResponse {
    let user = match AuthService::require_role(db.get_ref(), &auth_user, Role::User).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    match PaiementService::creer_intention(
        db.get_ref(),
        stripe.get_ref(),
        &user,
        body.reservation_id,
    )
    .await
    {
        Ok((paiement, intention)) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "data": {
                "paiement": paiement,
                "client_secret": intention.client_secret
            }
        })),
        Err(e) => e.en_reponse(),
    }
}

/// GET /api/paiements/reservation/{id} - Paiement d'une réservation
/// Visible par le voyageur, le prestataire concerné ou un admin.
#[get("/reservation/{id}")]
pub async fn paiement_de_reservation(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::resolve_user(db.get_ref(), &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let reservation_id = path.into_inner();

    let reservation = match reservations::Entity::find_by_id(reservation_id)
        .one(db.get_ref())
        .await
    {
        Ok(Some(reservation)) => reservation,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Réservation introuvable"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // voyageur, prestataire concerné ou admin
    let profil_id = if user.role == Role::Prestataire {
        match AuthService::profil_optionnel(db.get_ref(), &user).await {
            Ok(profil_id) => profil_id,
            Err(e) => return e.en_reponse(),
        }
    } else {
        None
    };

    let autorise = user.role == Role::Admin
        || reservation.user_id == user.id
        || profil_id == Some(reservation.prestataire_id);

    if !autorise {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Accès interdit"
        }));
    }

    match PaiementService::paiement_de_reservation(db.get_ref(), reservation_id).await {
        Ok(paiement) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": paiement
        })),
        Err(e) => e.en_reponse(),
    }
}

pub fn paiements_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/paiements")
            .service(paiement_cash)
            .service(creer_intention)
            .service(paiement_de_reservation)
    );
}
