//! Customer entity - A person the shop sells to or services bikes for.
//!
//! Customers are created from the console, edited in place and never deleted.
//! Only `name` is required; every contact field is optional.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name, never empty
    pub name: String,
    /// Tax identification number
    pub tax_id: Option<String>,
    /// Contact email, used for birthday and inspection mail
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Calendar birthdate (no time of day)
    pub birthdate: Option<Date>,
    /// Postal address
    pub address: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the customer was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer owns many bikes
    #[sea_orm(has_many = "super::bike::Entity")]
    Bikes,
    /// One customer has many inspections
    #[sea_orm(has_many = "super::inspection::Entity")]
    Inspections,
    /// One customer has many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
    /// One customer has many notifications
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::bike::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bikes.def()
    }
}

impl Related<super::inspection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inspections.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
