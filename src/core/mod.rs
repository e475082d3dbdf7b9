//! Application core: the book manager facade and the service layer the CLI
//! drives.

pub mod manager;
pub mod services;
pub mod utils;

pub use manager::BookManager;
pub use services::{ServiceError, ServiceResult};
