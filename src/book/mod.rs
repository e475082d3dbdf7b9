//! Domain model: the book aggregate and the records it owns.

#[allow(clippy::module_inception)]
pub mod book;
pub mod budget;
pub mod charge;
pub mod event;
pub mod savings;

pub use book::{Book, SCHEMA_VERSION};
pub use budget::{Budget, Expense};
pub use charge::{Charge, ChargeKind};
pub use event::{Event, EventKind};
pub use savings::{SavingsEntry, SavingsGoal};
