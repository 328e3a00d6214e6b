pub mod health;
pub mod auth;
pub mod offres;
pub mod reservations;
pub mod paiements;
pub mod webhooks;
pub mod boosts;
pub mod parrainages;
pub mod favoris;
pub mod avis;
pub mod notifications;
pub mod prestataires;
pub mod depenses;
pub mod admin;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(offres::offres_routes)
            .configure(reservations::reservations_routes)
            .configure(paiements::paiements_routes)
            .configure(webhooks::webhooks_routes)
            .configure(boosts::boosts_routes)
            .configure(parrainages::parrainages_routes)
            .configure(favoris::favoris_routes)
            .configure(avis::avis_routes)
            .configure(notifications::notifications_routes)
            .configure(prestataires::prestataires_routes)
            .configure(depenses::depenses_routes)
            .configure(admin::admin_routes)
    );
}
