//! Application services layered over an open [`crate::book::Book`].
//!
//! Each service borrows the manager's book mutably for one operation and
//! leaves persistence to the caller.

pub mod agenda_service;
pub mod budget_service;
pub mod charge_service;
pub mod event_service;
pub mod savings_service;

pub use agenda_service::{AgendaItem, AgendaService, AgendaSource, MonthMarks};
pub use budget_service::BudgetService;
pub use charge_service::ChargeService;
pub use event_service::EventService;
pub use savings_service::SavingsService;

use thiserror::Error;

use crate::errors::BookError;
use crate::schedule::ScheduleError;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// What a service call can fail with: a domain failure, a recurrence-rule
/// failure, or bad input caught before it touches the book.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Book(#[from] BookError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("{0}")]
    Invalid(String),
}
