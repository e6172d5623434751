//! Inspection entity - A safety inspection of one bike for one customer.
//!
//! `status` is the only state machine in the system. New inspections start as
//! `scheduled`; every other transition is made by staff, except the fixed
//! "mark completed" action which is only valid from `scheduled` or `pending`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an inspection, stored as lowercase text.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum InspectionStatus {
    /// Booked for a future date
    #[default]
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    /// Done
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Waiting on the customer or on parts
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Will not happen
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl InspectionStatus {
    /// The stored text form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the "mark completed" action may be applied.
    #[must_use]
    pub const fn can_complete(self) -> bool {
        matches!(self, Self::Scheduled | Self::Pending)
    }

    /// Whether the inspection still has to happen (and so deserves a reminder).
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Scheduled | Self::Pending)
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inspection database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inspections")]
pub struct Model {
    /// Unique identifier for the inspection
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the customer who owns the bike
    pub customer_id: i64,
    /// ID of the inspected bike
    pub bike_id: i64,
    /// Day the inspection takes (or took) place
    pub date: Date,
    /// Day the following inspection is due, never before `date`
    pub next_inspection_date: Date,
    /// Current lifecycle state
    pub status: InspectionStatus,
    /// Free-text notes
    pub notes: Option<String>,
    /// Fee charged for the inspection itself
    pub inspection_fee: Option<f64>,
    /// Fee charged for labor
    pub labor_fee: Option<f64>,
    /// Invoice attachment reference (filename or URL)
    pub invoice_file: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Sum of both fees, treating missing fees as zero.
    #[must_use]
    pub fn total_fee(&self) -> f64 {
        self.inspection_fee.unwrap_or(0.0) + self.labor_fee.unwrap_or(0.0)
    }
}

/// Defines relationships between Inspection and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each inspection belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// Each inspection targets exactly one bike
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
