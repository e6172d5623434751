//! Notification entity - An entry in the dashboard notification feed.
//!
//! Notifications are written by the sale linker and by the mail flows, read by
//! the dashboard, and only ever mutated by marking them read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a notification is about, stored as lowercase text in column `type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Inspection reminders
    #[sea_orm(string_value = "inspection")]
    Inspection,
    /// Birthday greetings
    #[sea_orm(string_value = "birthday")]
    Birthday,
    /// Shop events such as new sales
    #[sea_orm(string_value = "system")]
    System,
    /// Outgoing mail
    #[sea_orm(string_value = "email")]
    Email,
}

impl NotificationKind {
    /// Emoji shown next to the notification in the feed.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Inspection => "🔧",
            Self::Birthday => "🎂",
            Self::System => "🛒",
            Self::Email => "✉️",
        }
    }
}

/// Notification database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier for the notification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Category of the notification
    #[sea_orm(column_name = "type")]
    pub kind: NotificationKind,
    /// Whether staff have seen it
    pub read: bool,
    /// When the notification was created
    pub created_at: DateTimeUtc,
    /// Customer the notification concerns, if any
    pub customer_id: Option<i64>,
}

/// Defines relationships between Notification and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each notification may concern one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
