//! Unified error type for the whole crate.
//!
//! Every fallible operation in `core`, `config`, `mail` and `bot` returns
//! [`Result`]. Validation failures are raised before anything is written to
//! the store; store failures are wrapped as-is.

use crate::{entities::inspection::InspectionStatus, mail::MailError};
use sea_orm::DbErr;
use std::fmt;
use thiserror::Error;

/// A step of the sale linker, reported when that step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleStep {
    /// Inline creation of a new customer
    CreateCustomer,
    /// Bicycle find-or-create
    ResolveBike,
    /// Sale insert
    InsertSale,
    /// Follow-up inspection insert
    ScheduleInspection,
    /// "New sale" notification insert
    Notify,
}

impl fmt::Display for SaleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateCustomer => "create customer",
            Self::ResolveBike => "resolve bike",
            Self::InsertSale => "insert sale",
            Self::ScheduleInspection => "schedule inspection",
            Self::Notify => "notify",
        };
        f.write_str(name)
    }
}

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: i64 },

    #[error("Bike not found: {id}")]
    BikeNotFound { id: i64 },

    #[error("Inspection not found: {id}")]
    InspectionNotFound { id: i64 },

    #[error("Sale not found: {id}")]
    SaleNotFound { id: i64 },

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: i64 },

    #[error("Cannot move inspection from {from} to {to}")]
    InvalidStatusTransition {
        from: InspectionStatus,
        to: InspectionStatus,
    },

    #[error("Sale aborted at step '{step}': {source}")]
    SaleStep {
        step: SaleStep,
        #[source]
        source: Box<Error>,
    },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the error was caused by the operator's input rather than the system.
    ///
    /// The console answers these inline instead of treating them as failures.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Validation { .. }
            | Self::InvalidAmount { .. }
            | Self::CustomerNotFound { .. }
            | Self::BikeNotFound { .. }
            | Self::InspectionNotFound { .. }
            | Self::SaleNotFound { .. }
            | Self::NotificationNotFound { .. }
            | Self::InvalidStatusTransition { .. } => true,
            Self::SaleStep { source, .. } => source.is_user_error(),
            _ => false,
        }
    }

    /// Wraps this error as the failure of a sale linker step.
    #[must_use]
    pub fn at_step(self, step: SaleStep) -> Self {
        Self::SaleStep {
            step,
            source: Box::new(self),
        }
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
