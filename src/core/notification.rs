//! Notification business logic - the dashboard feed.
//!
//! Notifications are append-only apart from the read flag. Writers are the sale
//! linker and the outreach flows; the dashboard only reads and marks them read.

use crate::{
    entities::{Notification, NotificationKind, notification},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*, sea_query::Expr};
use tracing::info;

/// Default number of notifications shown in the feed.
pub const DEFAULT_FEED_LIMIT: u64 = 10;

/// Input for a new notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Category
    pub kind: NotificationKind,
    /// Customer concerned, if any
    pub customer_id: Option<i64>,
}

/// Inserts an unread notification stamped with the current time.
pub async fn create_notification<C>(
    conn: &C,
    input: NewNotification,
) -> Result<notification::Model>
where
    C: ConnectionTrait,
{
    let notification = notification::ActiveModel {
        title: Set(input.title),
        message: Set(input.message),
        kind: Set(input.kind),
        read: Set(false),
        created_at: Set(chrono::Utc::now()),
        customer_id: Set(input.customer_id),
        ..Default::default()
    };
    let created = notification.insert(conn).await?;
    info!(
        notification_id = created.id,
        kind = ?created.kind,
        "Created notification '{}'",
        created.title
    );
    Ok(created)
}

/// Retrieves the newest notifications, at most `limit` of them.
pub async fn list_notifications(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<notification::Model>> {
    Notification::find()
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts notifications not yet marked read.
pub async fn count_unread(db: &DatabaseConnection) -> Result<u64> {
    Notification::find()
        .filter(notification::Column::Read.eq(false))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Marks one notification read. Marking an already-read notification is a no-op.
///
/// # Errors
/// Returns [`Error::NotificationNotFound`] if no notification has this ID.
pub async fn mark_read(db: &DatabaseConnection, notification_id: i64) -> Result<notification::Model> {
    let existing = Notification::find_by_id(notification_id)
        .one(db)
        .await?
        .ok_or(Error::NotificationNotFound {
            id: notification_id,
        })?;

    if existing.read {
        return Ok(existing);
    }

    let mut active: notification::ActiveModel = existing.into();
    active.read = Set(true);
    active.update(db).await.map_err(Into::into)
}

/// Marks every unread notification read and returns how many changed.
pub async fn mark_all_read(db: &DatabaseConnection) -> Result<u64> {
    let result = Notification::update_many()
        .col_expr(notification::Column::Read, Expr::value(true))
        .filter(notification::Column::Read.eq(false))
        .exec(db)
        .await?;
    info!("Marked {} notifications as read", result.rows_affected);
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn system(title: &str) -> NewNotification {
        NewNotification {
            title: title.to_string(),
            message: format!("{title} body"),
            kind: NotificationKind::System,
            customer_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        create_notification(&db, system("first")).await?;
        create_notification(&db, system("second")).await?;
        create_notification(&db, system("third")).await?;

        let feed = list_notifications(&db, 2).await?;
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].title, "third");
        assert_eq!(feed[1].title, "second");
        assert!(feed.iter().all(|n| !n.read));
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_and_count() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_notification(&db, system("first")).await?;
        create_notification(&db, system("second")).await?;
        assert_eq!(count_unread(&db).await?, 2);

        let marked = mark_read(&db, first.id).await?;
        assert!(marked.read);
        assert_eq!(count_unread(&db).await?, 1);

        // Idempotent
        let again = mark_read(&db, first.id).await?;
        assert!(again.read);
        assert_eq!(count_unread(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_missing() -> Result<()> {
        let db = setup_test_db().await?;
        let result = mark_read(&db, 7).await;
        assert!(matches!(result, Err(Error::NotificationNotFound { id: 7 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_all_read() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_notification(&db, system("first")).await?;
        create_notification(&db, system("second")).await?;
        create_notification(&db, system("third")).await?;
        mark_read(&db, first.id).await?;

        assert_eq!(mark_all_read(&db).await?, 2);
        assert_eq!(count_unread(&db).await?, 0);
        assert_eq!(mark_all_read(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_notification_kind_round_trips() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let created = create_notification(
            &db,
            NewNotification {
                title: "Feliz aniversário".to_string(),
                message: "Birthday mail sent".to_string(),
                kind: NotificationKind::Birthday,
                customer_id: Some(customer.id),
            },
        )
        .await?;

        let feed = list_notifications(&db, DEFAULT_FEED_LIMIT).await?;
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, created.id);
        assert_eq!(feed[0].kind, NotificationKind::Birthday);
        assert_eq!(feed[0].customer_id, Some(customer.id));
        Ok(())
    }
}
