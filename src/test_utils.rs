//! Shared test utilities for the bike shop.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::shop::ShopDetails,
    core::{
        bike,
        customer::{self, NewCustomer},
        inspection::{self, BikeChoice, NewInspection},
    },
    entities,
    errors::Result,
    mail::{MailError, MailRequest, Mailer},
};
use chrono::{Months, NaiveDate};
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Shorthand for a calendar date; panics on an invalid date.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Shop details used by outreach tests.
pub fn test_shop() -> ShopDetails {
    ShopDetails {
        name: "Test Bikes".to_string(),
        address: "Rua Direita 1, Lisboa".to_string(),
        phone: "210 000 000".to_string(),
        inspection_time: "10:00".to_string(),
        birthday_coupon: Some("BDAY10".to_string()),
    }
}

/// Creates a test customer with only a name.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::customer::Model> {
    customer::create_customer(db, NewCustomer::named(name)).await
}

/// Creates a test customer with a birthdate.
pub async fn create_test_customer_with_birthdate(
    db: &DatabaseConnection,
    name: &str,
    birthdate: NaiveDate,
) -> Result<entities::customer::Model> {
    customer::create_customer(
        db,
        NewCustomer {
            birthdate: Some(birthdate),
            ..NewCustomer::named(name)
        },
    )
    .await
}

/// Sets up a test database with one customer already registered.
/// Returns (db, customer) for convenience.
pub async fn setup_with_customer() -> Result<(DatabaseConnection, entities::customer::Model)> {
    let db = setup_test_db().await?;
    let customer = create_test_customer(&db, "Test Customer").await?;
    Ok((db, customer))
}

/// Creates a test bike without a serial number.
pub async fn create_test_bike(
    db: &DatabaseConnection,
    customer_id: i64,
    model: &str,
) -> Result<entities::bike::Model> {
    bike::create_bike(db, customer_id, model, None).await
}

/// Creates a scheduled inspection for an existing bike.
pub async fn create_test_inspection(
    db: &DatabaseConnection,
    customer_id: i64,
    bike_id: i64,
    date: NaiveDate,
    next_inspection_date: NaiveDate,
) -> Result<entities::inspection::Model> {
    inspection::schedule_inspection(
        db,
        NewInspection::scheduled(
            customer_id,
            BikeChoice::Existing(bike_id),
            date,
            next_inspection_date,
        ),
    )
    .await
}

/// Creates a scheduled inspection with fees, due one year after `date`.
pub async fn create_test_inspection_with_fees(
    db: &DatabaseConnection,
    customer_id: i64,
    bike_id: i64,
    date: NaiveDate,
    inspection_fee: Option<f64>,
    labor_fee: Option<f64>,
) -> Result<entities::inspection::Model> {
    #[allow(clippy::unwrap_used)]
    let next_inspection_date = date.checked_add_months(Months::new(12)).unwrap();
    inspection::schedule_inspection(
        db,
        NewInspection {
            inspection_fee,
            labor_fee,
            ..NewInspection::scheduled(
                customer_id,
                BikeChoice::Existing(bike_id),
                date,
                next_inspection_date,
            )
        },
    )
    .await
}

/// A [`Mailer`] that records requests instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailRequest>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose every send fails with HTTP 503.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// Requests accepted so far.
    #[allow(clippy::unwrap_used)]
    pub fn sent(&self) -> Vec<MailRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, request: &MailRequest) -> std::result::Result<(), MailError> {
        if self.fail {
            return Err(MailError::HttpStatus(503));
        }
        #[allow(clippy::unwrap_used)]
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }
}
