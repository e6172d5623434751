//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the shop's five record kinds and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bike;
pub mod customer;
pub mod inspection;
pub mod notification;
pub mod sale;

// Re-export specific types to avoid conflicts
pub use bike::{Column as BikeColumn, Entity as Bike, Model as BikeModel};
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use inspection::{
    Column as InspectionColumn, Entity as Inspection, InspectionStatus, Model as InspectionModel,
};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
    NotificationKind,
};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
