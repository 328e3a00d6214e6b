use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait, PaginatorTrait};
use serde::Deserialize;
use validator::Validate;
use rust_decimal::Decimal;
use chrono::{NaiveDateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::middleware::AuthUser;
use crate::models::dto::OffreAvecScore;
use crate::models::enums::{PlanAbonnement, Role, TypeEvenementParrainage};
use crate::models::{boosts, offres, prestataires};
use crate::services::auth_service::AuthService;
use crate::services::parrainage_service::ParrainageService;
use crate::services::visibilite_service::VisibiliteService;

// DTO pour créer une offre
#[derive(Deserialize, Validate)]
pub struct CreateOffreRequest {
    #[validate(length(min = 3, max = 150))]
    pub titre: String,
    pub description: Option<String>,
    pub prix: Decimal, // prix unitaire par personne et par jour
    #[validate(length(min = 2, max = 50))]
    pub categorie: String,
    #[validate(length(min = 2, max = 50))]
    pub region: String,
}

// DTO pour modifier une offre
#[derive(Deserialize)]
pub struct UpdateOffreRequest {
    pub titre: Option<String>,
    pub description: Option<String>,
    pub prix: Option<Decimal>,
    pub categorie: Option<String>,
    pub region: Option<String>,
    pub est_active: Option<bool>,
}

// DTO pour la mise en vedette (admin)
#[derive(Deserialize)]
pub struct VedetteRequest {
    pub jusqua: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct ListeOffresQuery {
    pub region: Option<String>,
    pub categorie: Option<String>,
}

/// GET /api/offres - Listing public trié par score de visibilité
#[get("")]
pub async fn list_offres(
    query: web::Query<ListeOffresQuery>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Offres actives, filtrées par région/catégorie
    let mut requete = offres::Entity::find().filter(offres::Column::EstActive.eq(true));

    if let Some(region) = &query.region {
        requete = requete.filter(offres::Column::Region.eq(region));
    }
    if let Some(categorie) = &query.categorie {
        requete = requete.filter(offres::Column::Categorie.eq(categorie));
    }

    let liste = match requete.all(db.get_ref()).await {
        Ok(liste) => liste,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to fetch offers: {}", e)
            }));
        }
    };

    // 2. Plans des prestataires concernés en UNE SEULE query
    let prestataire_ids: Vec<i32> = liste
        .iter()
        .map(|o| o.prestataire_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let plans: HashMap<i32, PlanAbonnement> = prestataires::Entity::find()
        .filter(prestataires::Column::Id.is_in(prestataire_ids.clone()))
        .all(db.get_ref())
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|p| (p.id, p.plan))
        .collect();

    // 3. Boosts marqués actifs de ces prestataires; la fenêtre de validité
    //    est filtrée à la lecture par boost_applicable
    let boosts_actifs = boosts::Entity::find()
        .filter(boosts::Column::PrestataireId.is_in(prestataire_ids))
        .filter(boosts::Column::EstActif.eq(true))
        .all(db.get_ref())
        .await
        .unwrap_or_default();

    // 4. Score par offre, tri décroissant
    let maintenant = Utc::now().naive_utc();
    let mut response: Vec<OffreAvecScore> = liste
        .into_iter()
        .map(|offre| {
            let plan = plans
                .get(&offre.prestataire_id)
                .copied()
                .unwrap_or(PlanAbonnement::Gratuit);
            let boost = VisibiliteService::meilleur_boost(&boosts_actifs, &offre, maintenant);
            let note_moyenne = offre.note_moyenne();
            let score =
                VisibiliteService::score_visibilite(plan, boost, note_moyenne, offre.nombre_avis);

            OffreAvecScore {
                offre,
                note_moyenne,
                score,
            }
        })
        .collect();

    response.sort_by(|a, b| b.score.cmp(&a.score));

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": response
    }))
}

/// GET /api/offres/{id} - Détail d'une offre (PUBLIC)
#[get("/{id}")]
pub async fn get_offre(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let offre_id = path.into_inner();

    match offres::Entity::find_by_id(offre_id).one(db.get_ref()).await {
        Ok(Some(offre)) => {
            let note_moyenne = offre.note_moyenne();
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "data": {
                    "offre": offre,
                    "note_moyenne": note_moyenne
                }
            }))
        }
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "Offre introuvable"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch offer: {}", e)
        })),
    }
}

/// POST /api/offres - Publier une offre (PRESTATAIRE)
#[post("")]
pub async fn create_offre(
    auth_user: AuthUser,
    body: web::Json<CreateOffreRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    if body.prix <= Decimal::ZERO {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Le prix doit être supérieur à 0"
        }));
    }

    let (_, profil) = match AuthService::require_prestataire(db.get_ref(), &auth_user).await {
        Ok(resultat) => resultat,
        Err(e) => return e.en_reponse(),
    };

    // Plafond d'offres actives selon le plan
    if let Some(limite) = VisibiliteService::limite_offres_actives(profil.plan) {
        let actives = match offres::Entity::find()
            .filter(offres::Column::PrestataireId.eq(profil.id))
            .filter(offres::Column::EstActive.eq(true))
            .count(db.get_ref())
            .await
        {
            Ok(n) => n,
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "error": format!("Database error: {}", e)
                }));
            }
        };

        if actives >= limite {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!(
                    "Limite de {} offres actives atteinte pour le plan {:?}",
                    limite, profil.plan
                )
            }));
        }
    }

    // Première offre publiée: événement de parrainage
    let premiere_offre = match offres::Entity::find()
        .filter(offres::Column::PrestataireId.eq(profil.id))
        .count(db.get_ref())
        .await
    {
        Ok(n) => n == 0,
        Err(_) => false,
    };

    let nouvelle = offres::ActiveModel {
        prestataire_id: Set(profil.id),
        titre: Set(body.titre.clone()),
        description: Set(body.description.clone()),
        prix: Set(body.prix),
        categorie: Set(body.categorie.clone()),
        region: Set(body.region.clone()),
        est_active: Set(true),
        est_en_vedette: Set(false),
        vedette_jusqua: Set(None),
        somme_notes: Set(0),
        nombre_avis: Set(0),
        ..Default::default()
    };

    let offre = match nouvelle.insert(db.get_ref()).await {
        Ok(offre) => offre,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to create offer: {}", e)
            }));
        }
    };

    if premiere_offre {
        if let Err(e) = ParrainageService::crediter_pour_filleul(
            db.get_ref(),
            profil.id,
            TypeEvenementParrainage::PremiereOffrePubliee,
        )
        .await
        {
            eprintln!("⚠️  Referral credit failed: {}", e);
        }
    }

    HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "data": offre
    }))
}

/// PUT /api/offres/{id} - Modifier une offre (propriétaire ou admin)
#[put("/{id}")]
pub async fn update_offre(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateOffreRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let offre_id = path.into_inner();

    let (offre, _) = match charger_offre_possedee(db.get_ref(), &auth_user, offre_id).await {
        Ok(resultat) => resultat,
        Err(reponse) => return reponse,
    };

    if let Some(prix) = body.prix {
        if prix <= Decimal::ZERO {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "Le prix doit être supérieur à 0"
            }));
        }
    }

    let mut active: offres::ActiveModel = offre.into();
    if let Some(titre) = &body.titre {
        active.titre = Set(titre.clone());
    }
    if let Some(description) = &body.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(prix) = body.prix {
        active.prix = Set(prix);
    }
    if let Some(categorie) = &body.categorie {
        active.categorie = Set(categorie.clone());
    }
    if let Some(region) = &body.region {
        active.region = Set(region.clone());
    }
    if let Some(est_active) = body.est_active {
        active.est_active = Set(est_active);
    }

    match active.update(db.get_ref()).await {
        Ok(offre) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": offre
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to update offer: {}", e)
        })),
    }
}

/// PUT /api/offres/{id}/vedette - Mise en vedette bornée dans le temps (ADMIN)
#[put("/{id}/vedette")]
pub async fn mettre_en_vedette(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<VedetteRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = AuthService::require_role(db.get_ref(), &auth_user, Role::Admin).await {
        return e.en_reponse();
    }

    let offre_id = path.into_inner();
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

    let mut active: offres::ActiveModel = offre.into();
    active.est_en_vedette = Set(true);
    active.vedette_jusqua = Set(Some(body.jusqua));

    match active.update(db.get_ref()).await {
        Ok(offre) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": offre
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to update offer: {}", e)
        })),
    }
}

/// DELETE /api/offres/{id} - Supprimer une offre (propriétaire ou admin)
/// Les réservations et avis liés suivent les règles ON DELETE de la BD.
#[delete("/{id}")]
pub async fn delete_offre(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let offre_id = path.into_inner();

    let (offre, _) = match charger_offre_possedee(db.get_ref(), &auth_user, offre_id).await {
        Ok(resultat) => resultat,
        Err(reponse) => return reponse,
    };

    match offres::Entity::delete_by_id(offre.id).exec(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Offre supprimée"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to delete offer: {}", e)
        })),
    }
}

// Charge une offre et vérifie que l'appelant en est le propriétaire (via son
// profil prestataire) ou un admin
async fn charger_offre_possedee(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
    offre_id: i32,
) -> Result<(offres::Model, Option<i32>), HttpResponse> {
    let user = match AuthService::require_role(db, auth_user, Role::Prestataire).await {
        Ok(user) => user,
        Err(e) => return Err(e.en_reponse()),
    };

    let profil_id = match AuthService::profil_optionnel(db, &user).await {
        Ok(profil_id) => profil_id,
        Err(e) => return Err(e.en_reponse()),
    };

    let offre = match offres::Entity::find_by_id(offre_id).one(db).await {
        Ok(Some(offre)) => offre,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Offre introuvable"
            })));
        }
        Err(e) => {
            return Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Database error: {}", e)
            })));
        }
    };

    let autorise = user.role == Role::Admin || profil_id == Some(offre.prestataire_id);
    if !autorise {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Accès interdit"
        })));
    }

    Ok((offre, profil_id))
}

pub fn offres_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/offres")
            .service(list_offres)
            .service(create_offre)
            .service(mettre_en_vedette)
            .service(get_offre)
            .service(update_offre)
            .service(delete_offre)
    );
}
