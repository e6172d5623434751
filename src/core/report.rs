//! Report generation business logic.
//!
//! Aggregates inspections and sales into the twelve monthly buckets of the
//! activity report and computes the headline numbers of the dashboard. The
//! aggregation itself is pure; the `load_*` functions fetch the rows first.

use crate::{
    entities::{Customer, Inspection, InspectionStatus, Sale, inspection, sale},
    errors::Result,
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{PaginatorTrait, prelude::*};

/// Short month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Activity of one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyActivity {
    /// Short month label ("Jan".."Dec")
    pub month: &'static str,
    /// Number of inspections dated in this month, whatever their status
    pub inspections: u32,
    /// Fees of the month's completed inspections
    pub inspection_revenue: f64,
    /// Sum of the month's sale prices
    pub sale_revenue: f64,
}

impl MonthlyActivity {
    const fn empty(month: &'static str) -> Self {
        Self {
            month,
            inspections: 0,
            inspection_revenue: 0.0,
            sale_revenue: 0.0,
        }
    }

    /// Inspection and sale revenue together.
    #[must_use]
    pub fn total_revenue(&self) -> f64 {
        self.inspection_revenue + self.sale_revenue
    }
}

fn month_index(date: NaiveDate) -> usize {
    date.month0() as usize
}

/// Buckets inspections and sales of `year` into twelve months, January first.
///
/// Inspections are counted by their `date`. Only completed inspections add to
/// revenue. Rows from other years are ignored.
#[must_use]
pub fn monthly_activity(
    inspections: &[inspection::Model],
    sales: &[sale::Model],
    year: i32,
) -> Vec<MonthlyActivity> {
    let mut months = MONTH_LABELS.map(MonthlyActivity::empty).to_vec();

    for inspection in inspections.iter().filter(|i| i.date.year() == year) {
        let bucket = &mut months[month_index(inspection.date)];
        bucket.inspections += 1;
        if inspection.status == InspectionStatus::Completed {
            bucket.inspection_revenue += inspection.total_fee();
        }
    }

    for sale in sales.iter().filter(|s| s.date.year() == year) {
        months[month_index(sale.date)].sale_revenue += sale.price;
    }

    months
}

/// Loads every inspection and sale and aggregates `year`.
pub async fn load_monthly_activity(
    db: &DatabaseConnection,
    year: i32,
) -> Result<Vec<MonthlyActivity>> {
    let inspections = Inspection::find().all(db).await?;
    let sales = Sale::find().all(db).await?;
    Ok(monthly_activity(&inspections, &sales, year))
}

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub customers: u64,
    pub inspections: u64,
    pub completed_inspections: u64,
    pub pending_inspections: u64,
    /// Sum of sale prices dated in the requested year
    pub sales_total: f64,
}

/// Counts customers and inspections and totals the year's sales.
pub async fn dashboard_stats(db: &DatabaseConnection, year: i32) -> Result<DashboardStats> {
    let customers = Customer::find().count(db).await?;
    let inspections = Inspection::find().count(db).await?;
    let completed_inspections = Inspection::find()
        .filter(inspection::Column::Status.eq(InspectionStatus::Completed))
        .count(db)
        .await?;
    let pending_inspections = Inspection::find()
        .filter(inspection::Column::Status.eq(InspectionStatus::Pending))
        .count(db)
        .await?;

    let sales_total = Sale::find()
        .all(db)
        .await?
        .iter()
        .filter(|s| s.date.year() == year)
        .map(|s| s.price)
        .sum();

    Ok(DashboardStats {
        customers,
        inspections,
        completed_inspections,
        pending_inspections,
        sales_total,
    })
}

/// Formats an amount in euros with two decimals, e.g. `€1234.50`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-€{:.2}", amount.abs())
    } else {
        format!("€{amount:.2}")
    }
}

/// Renders a text bar proportional to `value / max`, e.g. `████░░░░░░`.
///
/// A zero `max` renders an empty bar.
#[must_use]
pub fn format_bar(value: f64, max: f64, bar_length: usize) -> String {
    let ratio = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };

    // ratio ∈ [0, 1] and bar_length is small, so the cast cannot truncate
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = (ratio * bar_length as f64).round() as usize;
    let empty = bar_length.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
