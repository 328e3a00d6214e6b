// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - enums : Rôles, statuts, plans et types (enums SeaORM stockés en texte)
//   - users : Comptes (un compte par couple email/rôle)
//   - prestataires : Profil prestataire 1:1 avec un compte PRESTATAIRE
//   - offres : Offres touristiques (agrégat d'avis somme + compteur)
//   - reservations : Réservations (PENDING/CONFIRMED/CANCELLED/COMPLETED)
//   - paiements : Paiements 1:1 avec une réservation (cash ou Stripe)
//   - boosts : Boosts de visibilité à fenêtre de validité
//   - parrainages : Lien parrain → filleul entre prestataires
//   - parrainage_evenements : Événements de points (1 fois par type/parrainage)
//   - avis : Avis (1 par utilisateur et par offre)
//   - favoris : Favoris des voyageurs
//   - notifications : Notifications (destinataire user XOR prestataire)
//   - depenses : Dépenses des prestataires
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les contraintes d'unicité composites (email+role, user+offre,
//     parrainage+type d'événement) sont définies par les migrations SQL
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod health;
pub mod enums;
pub mod users;
pub mod prestataires;
pub mod offres;
pub mod reservations;
pub mod paiements;
pub mod boosts;
pub mod parrainages;
pub mod parrainage_evenements;
pub mod avis;
pub mod favoris;
pub mod notifications;
pub mod depenses;
pub mod dto;
