use sea_orm::*;

use crate::models::notifications;

pub struct NotificationService;

impl NotificationService {
    /// Notification adressée à un voyageur
    pub async fn notifier_user(
        db: &DatabaseConnection,
        user_id: i32,
        titre: &str,
        message: &str,
        lien: Option<String>,
    ) -> Result<(), DbErr> {
        let notification = notifications::ActiveModel {
            user_id: Set(Some(user_id)),
            prestataire_id: Set(None),
            titre: Set(titre.to_string()),
            message: Set(message.to_string()),
            lien: Set(lien),
            est_lue: Set(false),
            ..Default::default()
        };

        notification.insert(db).await?;
        Ok(())
    }

    /// Notification adressée à un prestataire
    pub async fn notifier_prestataire(
        db: &DatabaseConnection,
        prestataire_id: i32,
        titre: &str,
        message: &str,
        lien: Option<String>,
    ) -> Result<(), DbErr> {
        let notification = notifications::ActiveModel {
            user_id: Set(None),
            prestataire_id: Set(Some(prestataire_id)),
            titre: Set(titre.to_string()),
            message: Set(message.to_string()),
            lien: Set(lien),
            est_lue: Set(false),
            ..Default::default()
        };

        notification.insert(db).await?;
        Ok(())
    }
}
