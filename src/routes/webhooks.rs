use actix_web::{post, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::services::paiement_service::PaiementService;
use crate::services::stripe_service::{self, StripeClient};

/// POST /api/webhooks/stripe - Réconciliation des paiements Stripe
/// Le corps brut est vérifié contre le header Stripe-Signature AVANT tout
/// parsing; une charge non authentifiée est rejetée sans effet de bord.
#[post("/stripe")]
pub async fn stripe_webhook(
    req: HttpRequest,
    corps: web::Bytes,
    db: web::Data<DatabaseConnection>,
    stripe: web::Data<StripeClient>,
) -> HttpResponse {
    // 1. Signature
    let signature = req
        .headers()
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !stripe_service::verifier_signature(&corps, signature, stripe.webhook_secret()) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Invalid webhook signature"
        }));
    }

    // 2. Parsing de l'événement
    let evenement: serde_json::Value = match serde_json::from_slice(&corps) {
        Ok(evenement) => evenement,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Invalid webhook payload: {}", e)
            }));
        }
    };

    let type_evenement = evenement["type"].as_str().unwrap_or("");
    let intent_id = evenement["data"]["object"]["id"].as_str().unwrap_or("");

    if intent_id.is_empty() {
        // événement sans objet identifiable: acquitté pour stopper la relivraison
        return HttpResponse::Ok().json(serde_json::json!({ "received": true }));
    }

    // 3. Réconciliation
    match PaiementService::traiter_evenement(db.get_ref(), type_evenement, intent_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "received": true })),
        Err(e) => e.en_reponse(),
    }
}

pub fn webhooks_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhooks")
            .service(stripe_webhook)
    );
}
