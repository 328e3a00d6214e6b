pub mod auth_service;
pub mod reservation_service;
pub mod paiement_service;
pub mod stripe_service;
pub mod visibilite_service;
pub mod parrainage_service;
pub mod avis_service;
pub mod notification_service;
