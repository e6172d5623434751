//! Sale entity - A product sold over the counter.
//!
//! The bike model and serial are a denormalized snapshot taken at sale time;
//! `bike_id` points at the bike record the sale linker resolved, if any.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Buying customer, if recorded
    pub customer_id: Option<i64>,
    /// Bike record created or found for this sale
    pub bike_id: Option<i64>,
    /// What was sold
    pub product_name: String,
    /// Bike model snapshot
    pub bike_model: Option<String>,
    /// Bike serial number snapshot
    pub bike_serial_number: Option<String>,
    /// Sale price, always positive
    pub price: f64,
    /// Day of the sale
    pub date: Date,
    /// Free-text notes
    pub notes: Option<String>,
    /// Invoice attachment reference (filename or URL)
    pub invoice_file: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale may belong to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// Each sale may reference one bike
    #[sea_orm(
        belongs_to = "super::bike::Entity",
        from = "Column::BikeId",
        to = "super::bike::Column::Id"
    )]
    Bike,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::bike::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bike.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
