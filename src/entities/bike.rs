//! Bike entity - A bicycle owned by a customer.
//!
//! The (`customer_id`, `model`, `serial_number`) triple is meant to be unique, but only
//! application-side lookups enforce it; there is no storage constraint.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bike database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bikes")]
pub struct Model {
    /// Unique identifier for the bike
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning customer
    pub customer_id: i64,
    /// Model name (e.g., "Trek Marlin 5")
    pub model: String,
    /// Frame serial number, NULL when unknown
    pub serial_number: Option<String>,
    /// When the bike was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Bike and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each bike belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// One bike has many inspections
    #[sea_orm(has_many = "super::inspection::Entity")]
    Inspections,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::inspection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inspections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
