use actix_web::{get, put, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder, Set, ActiveModelTrait, PaginatorTrait};
use sea_orm::sea_query::Expr;
use serde::Deserialize;
use rust_decimal::Decimal;

use crate::middleware::AuthUser;
use crate::models::dto::StatistiquesAdmin;
use crate::models::enums::{Role, StatutPaiement, StatutReservation};
use crate::models::{offres, paiements, prestataires, reservations, users};
use crate::services::auth_service::AuthService;
use crate::services::notification_service::NotificationService;

// DTO pour la suspension
#[derive(Deserialize)]
pub struct SuspensionRequest {
    pub suspendre: bool,
}

/// GET /api/admin/utilisateurs - Tous les comptes (ADMIN)
#[get("/utilisateurs")]
pub async fn list_utilisateurs(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = AuthService::require_role(db.get_ref(), &auth_user, Role::Admin).await {
        return e.en_reponse();
    }

    let liste = users::Entity::find()
        .order_by_desc(users::Column::Id)
        .all(db.get_ref())
        .await;

    match liste {
        Ok(liste) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": liste
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch users: {}", e)
        })),
    }
}

/// PUT /api/admin/utilisateurs/{id}/suspendre - Suspendre/réactiver (ADMIN)
/// La suspension d'un prestataire désactive ses offres dans la foulée.
#[put("/utilisateurs/{id}/suspendre")]
pub async fn suspendre_utilisateur(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<SuspensionRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = AuthService::require_role(db.get_ref(), &auth_user, Role::Admin).await {
        return e.en_reponse();
    }

    let cible = match users::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(cible)) => cible,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Utilisateur introuvable"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            }));
        }
    };

    let cible_id = cible.id;
    let cible_role = cible.role;

    let mut active: users::ActiveModel = cible.into();
    active.est_suspendu = Set(body.suspendre);

    let cible = match active.update(db.get_ref()).await {
        Ok(cible) => cible,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to update user: {}", e)
            }));
        }
    };

    // Cascade: les offres d'un prestataire suspendu sont désactivées
    if body.suspendre && cible_role == Role::Prestataire {
        let profil = prestataires::Entity::find()
            .filter(prestataires::Column::UserId.eq(cible_id))
            .one(db.get_ref())
            .await;

        if let Ok(Some(profil)) = profil {
            let resultat = offres::Entity::update_many()
                .col_expr(offres::Column::EstActive, Expr::value(false))
                .filter(offres::Column::PrestataireId.eq(profil.id))
                .exec(db.get_ref())
                .await;

            if let Err(e) = resultat {
                eprintln!("⚠️  Offer deactivation cascade failed: {}", e);
            }
        }
    }

    if body.suspendre {
        if let Err(e) = NotificationService::notifier_user(
            db.get_ref(),
            cible_id,
            "Compte suspendu",
            "Votre compte a été suspendu par un administrateur",
            None,
        )
        .await
        {
            eprintln!("⚠️  Suspension notification failed: {}", e);
        }
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": cible
    }))
}

/// GET /api/admin/reservations - Toutes les réservations (ADMIN)
#[get("/reservations")]
pub async fn list_reservations(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = AuthService::require_role(db.get_ref(), &auth_user, Role::Admin).await {
        return e.en_reponse();
    }

    let liste = reservations::Entity::find()
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

/// GET /api/admin/statistiques - Tableau de bord (ADMIN)
#[get("/statistiques")]
pub async fn statistiques(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = AuthService::require_role(db.get_ref(), &auth_user, Role::Admin).await {
        return e.en_reponse();
    }

    let total_users = users::Entity::find().count(db.get_ref()).await;
    let total_prestataires = prestataires::Entity::find().count(db.get_ref()).await;
    let total_offres = offres::Entity::find().count(db.get_ref()).await;
    let total_reservations = reservations::Entity::find().count(db.get_ref()).await;
    let reservations_confirmees = reservations::Entity::find()
        .filter(reservations::Column::Statut.eq(StatutReservation::Confirmed))
        .count(db.get_ref())
        .await;

    // Revenus: somme des paiements PAID
    let paiements_payes = paiements::Entity::find()
        .filter(paiements::Column::Statut.eq(StatutPaiement::Paid))
        .all(db.get_ref())
        .await;

    let stats = match (
        total_users,
        total_prestataires,
        total_offres,
        total_reservations,
        reservations_confirmees,
        paiements_payes,
    ) {
        (
            Ok(total_users),
            Ok(total_prestataires),
            Ok(total_offres),
            Ok(total_reservations),
            Ok(reservations_confirmees),
            Ok(paiements_payes),
        ) => StatistiquesAdmin {
            total_users,
            total_prestataires,
            total_offres,
            total_reservations,
            reservations_confirmees,
            revenus_confirmes: paiements_payes
                .iter()
                .map(|p| p.montant)
                .sum::<Decimal>(),
        },
        _ => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to compute statistics"
            }));
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": stats
    }))
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(list_utilisateurs)
            .service(suspendre_utilisateur)
            .service(list_reservations)
            .service(statistiques)
    );
}
