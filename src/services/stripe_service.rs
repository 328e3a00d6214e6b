use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::env;

type HmacSha256 = Hmac<Sha256>;

/// Tolérance sur l'horodatage de la signature webhook (anti-rejeu)
const TOLERANCE_SIGNATURE_SECONDES: i64 = 300;

/// Intention de paiement retournée par le processeur
#[derive(Debug, Clone)]
pub struct IntentionPaiement {
    pub id: String,
    pub client_secret: Option<String>,
}

/// État d'un compte connecté (payouts marketplace)
#[derive(Debug, Clone)]
pub struct EtatCompteConnecte {
    pub id: String,
    pub charges_enabled: bool,
    pub payouts_enabled: bool,
}

/// Contrat du collaborateur paiement. Les services métier dépendent de ce
/// trait, pas du client HTTP, ce qui permet un faux fournisseur en test.
#[async_trait]
pub trait FournisseurPaiement: Send + Sync {
    /// Crée une intention de paiement, avec transfert de destination vers le
    /// compte connecté du prestataire quand il est renseigné
    async fn creer_intention_paiement(
        &self,
        montant_centimes: i64,
        devise: &str,
        compte_destination: Option<&str>,
        reservation_id: i32,
    ) -> Result<IntentionPaiement, String>;

    /// Crée un compte connecté Express et retourne son id
    async fn creer_compte_connecte(&self, email: &str) -> Result<String, String>;

    /// Crée un lien d'onboarding pour un compte connecté
    async fn creer_lien_onboarding(&self, account_id: &str) -> Result<String, String>;

    /// Récupère l'état d'un compte connecté
    async fn statut_compte(&self, account_id: &str) -> Result<EtatCompteConnecte, String>;
}

/// Client HTTP vers l'API REST Stripe (form-encoded, auth Basic par clé secrète)
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
    onboarding_base_url: String,
}

impl StripeClient {
    pub fn from_env() -> Self {
        let secret_key = env::var("STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            eprintln!("⚠️  WARNING: STRIPE_SECRET_KEY not found in .env, Stripe calls will fail");
            String::new()
        });
        let webhook_secret = env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            eprintln!("⚠️  WARNING: STRIPE_WEBHOOK_SECRET not found in .env, webhooks will be rejected");
            String::new()
        });
        let onboarding_base_url = env::var("ONBOARDING_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self {
            http: reqwest::Client::new(),
            secret_key,
            webhook_secret,
            onboarding_base_url,
        }
    }

    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }

    async fn post_form(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, String> {
        let response = self
            .http
            .post(format!("https://api.stripe.com/v1/{}", path))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| format!("Stripe request failed: {}", e))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("Stripe response decode failed: {}", e))?;

        if !status.is_success() {
            let message = body["error"]["message"].as_str().unwrap_or("unknown error");
            return Err(format!("Stripe API error ({}): {}", status, message));
        }

        Ok(body)
    }

    async fn get(&self, path: &str) -> Result<serde_json::Value, String> {
        let response = self
            .http
            .get(format!("https://api.stripe.com/v1/{}", path))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .send()
            .await
            .map_err(|e| format!("Stripe request failed: {}", e))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("Stripe response decode failed: {}", e))?;

        if !status.is_success() {
            let message = body["error"]["message"].as_str().unwrap_or("unknown error");
            return Err(format!("Stripe API error ({}): {}", status, message));
        }

        Ok(body)
    }
}

#[async_trait]
impl FournisseurPaiement for StripeClient {
    async fn creer_intention_paiement(
        &self,
        montant_centimes: i64,
        devise: &str,
        compte_destination: Option<&str>,
        reservation_id: i32,
    ) -> Result<IntentionPaiement, String> {
        let mut params = vec![
            ("amount".to_string(), montant_centimes.to_string()),
            ("currency".to_string(), devise.to_string()),
            (
                "metadata[reservation_id]".to_string(),
                reservation_id.to_string(),
            ),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        if let Some(compte) = compte_destination {
            params.push(("transfer_data[destination]".to_string(), compte.to_string()));
        }

        let body = self.post_form("payment_intents", &params).await?;

        let id = body["id"]
            .as_str()
            .ok_or("Stripe response missing intent id")?
            .to_string();
        let client_secret = body["client_secret"].as_str().map(|s| s.to_string());

        Ok(IntentionPaiement { id, client_secret })
    }

    async fn creer_compte_connecte(&self, email: &str) -> Result<String, String> {
        let params = vec![
            ("type".to_string(), "express".to_string()),
            ("email".to_string(), email.to_string()),
        ];

        let body = self.post_form("accounts", &params).await?;

        body["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| "Stripe response missing account id".to_string())
    }

    async fn creer_lien_onboarding(&self, account_id: &str) -> Result<String, String> {
        let params = vec![
            ("account".to_string(), account_id.to_string()),
            (
                "refresh_url".to_string(),
                format!("{}/prestataire/onboarding/retry", self.onboarding_base_url),
            ),
            (
                "return_url".to_string(),
                format!("{}/prestataire/onboarding/done", self.onboarding_base_url),
            ),
            ("type".to_string(), "account_onboarding".to_string()),
        ];

        let body = self.post_form("account_links", &params).await?;

        body["url"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| "Stripe response missing onboarding url".to_string())
    }

    async fn statut_compte(&self, account_id: &str) -> Result<EtatCompteConnecte, String> {
        let body = self.get(&format!("accounts/{}", account_id)).await?;

        Ok(EtatCompteConnecte {
            id: account_id.to_string(),
            charges_enabled: body["charges_enabled"].as_bool().unwrap_or(false),
            payouts_enabled: body["payouts_enabled"].as_bool().unwrap_or(false),
        })
    }
}

/// Vérifie un header `Stripe-Signature` (format `t=<ts>,v1=<hex>,...`):
/// HMAC-SHA256 de `<ts>.<payload>` avec le secret partagé, comparaison en
/// temps constant, horodatage dans la fenêtre de tolérance.
pub fn verifier_signature(payload: &[u8], header: &str, secret: &str) -> bool {
    verifier_signature_a(
        payload,
        header,
        secret,
        TOLERANCE_SIGNATURE_SECONDES,
        chrono::Utc::now().timestamp(),
    )
}

fn verifier_signature_a(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secondes: i64,
    maintenant: i64,
) -> bool {
    if secret.is_empty() {
        return false;
    }

    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for partie in header.split(',') {
        match partie.trim().split_once('=') {
            Some(("t", valeur)) => timestamp = valeur.parse::<i64>().ok(),
            Some(("v1", valeur)) => signatures.push(valeur),
            _ => {}
        }
    }

    let timestamp = match timestamp {
        Some(t) => t,
        None => return false,
    };

    if (maintenant - timestamp).abs() > tolerance_secondes {
        return false;
    }

    for signature in signatures {
        let attendu = match hex::decode(signature) {
            Ok(bytes) => bytes,
            Err(_) => continue,
        };

        let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        // verify_slice fait la comparaison en temps constant
        if mac.verify_slice(&attendu).is_ok() {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    fn signer(payload: &[u8], timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_signature_valide() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = format!("t=1000,v1={}", signer(payload, 1000));

        assert!(verifier_signature_a(payload, &header, SECRET, 300, 1010));
    }

    #[test]
    fn test_signature_falsifiee_rejetee() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = format!("t=1000,v1={}", signer(b"autre payload", 1000));

        assert!(!verifier_signature_a(payload, &header, SECRET, 300, 1010));
    }

    #[test]
    fn test_horodatage_hors_fenetre_rejete() {
        let payload = b"{}";
        let header = format!("t=1000,v1={}", signer(payload, 1000));

        assert!(!verifier_signature_a(payload, &header, SECRET, 300, 2000));
    }

    #[test]
    fn test_header_malforme_rejete() {
        assert!(!verifier_signature_a(b"{}", "n'importe quoi", SECRET, 300, 0));
        assert!(!verifier_signature_a(b"{}", "v1=abcd", SECRET, 300, 0));
    }

    #[test]
    fn test_secret_absent_rejete() {
        let payload = b"{}";
        let header = format!("t=1000,v1={}", signer(payload, 1000));

        assert!(!verifier_signature_a(payload, &header, "", 300, 1000));
    }
}
