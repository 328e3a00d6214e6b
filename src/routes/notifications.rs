use actix_web::{delete, get, put, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder, Set, ActiveModelTrait};

use crate::middleware::AuthUser;
use crate::models::enums::Role;
use crate::models::{notifications, users};
use crate::services::auth_service::AuthService;

/// GET /api/notifications - Mes notifications (tous rôles)
/// Un compte prestataire lit les notifications adressées à son profil,
/// les autres comptes celles adressées à leur user_id.
#[get("")]
pub async fn mes_notifications(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::resolve_user(db.get_ref(), &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let mut requete = notifications::Entity::find();

    if user.role == Role::Prestataire {
        let profil_id = match AuthService::profil_optionnel(db.get_ref(), &user).await {
            Ok(Some(profil_id)) => profil_id,
            Ok(None) => {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "success": false,
                    "error": "Accès interdit"
                }));
            }
            Err(e) => return e.en_reponse(),
        };
        requete = requete.filter(notifications::Column::PrestataireId.eq(profil_id));
    } else {
        requete = requete.filter(notifications::Column::UserId.eq(user.id));
    }

    let liste = requete
        .order_by_desc(notifications::Column::Id)
        .all(db.get_ref())
        .await;

    match liste {
        Ok(liste) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": liste
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch notifications: {}", e)
        })),
    }
}

/// PUT /api/notifications/{id}/lue - Marquer comme lue (destinataire)
#[put("/{id}/lue")]
pub async fn marquer_lue(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::resolve_user(db.get_ref(), &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let notification = match charger_notification(db.get_ref(), &user, path.into_inner()).await {
        Ok(notification) => notification,
        Err(reponse) => return reponse,
    };

    let mut active: notifications::ActiveModel = notification.into();
    active.est_lue = Set(true);

    match active.update(db.get_ref()).await {
        Ok(notification) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": notification
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to update notification: {}", e)
        })),
    }
}

/// DELETE /api/notifications/{id} - Supprimer (destinataire ou admin)
#[delete("/{id}")]
pub async fn supprimer_notification(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match AuthService::resolve_user(db.get_ref(), &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.en_reponse(),
    };

    let notification = match charger_notification(db.get_ref(), &user, path.into_inner()).await {
        Ok(notification) => notification,
        Err(reponse) => return reponse,
    };

    match notifications::Entity::delete_by_id(notification.id)
        .exec(db.get_ref())
        .await
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Notification supprimée"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to delete notification: {}", e)
        })),
    }
}

// Charge une notification et vérifie que l'appelant en est le destinataire
// (user direct, ou profil prestataire) ou un admin
async fn charger_notification(
    db: &DatabaseConnection,
    user: &users::Model,
    notification_id: i32,
) -> Result<notifications::Model, HttpResponse> {
    let notification = match notifications::Entity::find_by_id(notification_id).one(db).await {
        Ok(Some(notification)) => notification,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Notification introuvable"
            })));
        }
        Err(e) => {
            return Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            })));
        }
    };

    let mut autorise = user.role == Role::Admin || notification.user_id == Some(user.id);

    if !autorise && user.role == Role::Prestataire {
        if let Ok(Some(profil_id)) = AuthService::profil_optionnel(db, user).await {
            autorise = notification.prestataire_id == Some(profil_id);
        }
    }

    if !autorise {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Accès interdit"
        })));
    }

    Ok(notification)
}

pub fn notifications_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .service(mes_notifications)
            .service(marquer_lue)
            .service(supprimer_notification)
    );
}
