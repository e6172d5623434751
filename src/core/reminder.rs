//! Reminder aggregation - who has a birthday and which inspections are due.
//!
//! The `find_*` functions are pure filters over already-loaded records: they
//! keep input order and skip records without a usable date.
//! [`load_dashboard_alerts`] is the store-backed entry point the dashboard uses.

use crate::{
    core::window::{self, Bucket, Window},
    entities::{Bike, Customer, Inspection, customer, inspection},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, prelude::*};
use std::collections::HashMap;
use tracing::debug;

/// Customers whose birthday falls on `today`.
#[must_use]
pub fn find_birthdays_today(
    customers: &[customer::Model],
    today: NaiveDate,
) -> Vec<&customer::Model> {
    customers
        .iter()
        .filter(|c| c.birthdate.is_some_and(|b| window::evaluate(b, today).is_today))
        .collect()
}

/// Open inspections whose next inspection date is between `today` and
/// `today + horizon_days`, both inclusive.
///
/// Completed and cancelled inspections never produce a reminder, nor do
/// overdue ones.
#[must_use]
pub fn find_upcoming_inspections(
    inspections: &[inspection::Model],
    horizon_days: u32,
    today: NaiveDate,
) -> Vec<&inspection::Model> {
    inspections
        .iter()
        .filter(|i| i.status.is_open())
        .filter(|i| {
            window::evaluate_due(i.next_inspection_date, today)
                .is_some_and(|w| w.is_within(i64::from(horizon_days)))
        })
        .collect()
}

/// Customers with a birthday within the next month, each with its window.
///
/// This drives the birthday badges of the customer list.
#[must_use]
pub fn upcoming_birthdays(
    customers: &[customer::Model],
    today: NaiveDate,
) -> Vec<(&customer::Model, Window)> {
    customers
        .iter()
        .filter_map(|c| {
            let window = window::evaluate(c.birthdate?, today);
            (window.bucket != Bucket::None).then_some((c, window))
        })
        .collect()
}

/// An upcoming inspection joined with the names staff want to see.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingInspection {
    pub inspection: inspection::Model,
    pub customer_name: String,
    pub bike_model: String,
    pub window: Window,
}

/// Everything the dashboard alert panel shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardAlerts {
    /// Customers whose birthday is today
    pub birthdays: Vec<customer::Model>,
    /// Open inspections due within the horizon, soonest first
    pub inspections: Vec<UpcomingInspection>,
}

impl DashboardAlerts {
    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.birthdays.is_empty() && self.inspections.is_empty()
    }
}

/// Loads customers, inspections and bikes and builds the dashboard alerts.
pub async fn load_dashboard_alerts(
    db: &DatabaseConnection,
    today: NaiveDate,
    horizon_days: u32,
) -> Result<DashboardAlerts> {
    let customers = Customer::find()
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await?;
    let inspections = Inspection::find()
        .order_by_asc(inspection::Column::NextInspectionDate)
        .order_by_asc(inspection::Column::Id)
        .all(db)
        .await?;
    let bikes = Bike::find().all(db).await?;

    let names: HashMap<i64, &str> = customers.iter().map(|c| (c.id, c.name.as_str())).collect();
    let models: HashMap<i64, &str> = bikes.iter().map(|b| (b.id, b.model.as_str())).collect();

    let upcoming = find_upcoming_inspections(&inspections, horizon_days, today)
        .into_iter()
        .map(|i| UpcomingInspection {
            customer_name: names.get(&i.customer_id).copied().unwrap_or("?").to_string(),
            bike_model: models.get(&i.bike_id).copied().unwrap_or("?").to_string(),
            window: window::evaluate_due(i.next_inspection_date, today).unwrap_or_else(Window::none),
            inspection: i.clone(),
        })
        .collect::<Vec<_>>();

    let birthdays = find_birthdays_today(&customers, today)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();

    debug!(
        birthdays = birthdays.len(),
        inspections = upcoming.len(),
        "Loaded dashboard alerts"
    );

    Ok(DashboardAlerts {
        birthdays,
        inspections: upcoming,
    })
}
