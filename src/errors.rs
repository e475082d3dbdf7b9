use thiserror::Error;

/// Error type that captures domain and persistence failures around books.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed book JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No book is loaded")]
    BookNotLoaded,
    #[error("Book not found: {0}")]
    BookNotFound(String),
    #[error("Unknown reference: {0}")]
    UnknownReference(String),
    #[error("Ambiguous reference `{0}` matches more than one record")]
    AmbiguousReference(String),
    #[error("Book schema v{found} is newer than the supported v{supported}")]
    SchemaTooNew { found: u8, supported: u8 },
    #[error("Balance of {balance:.2} cannot absorb a change of {amount:.2}")]
    BalanceFloor { balance: f64, amount: f64 },
    #[error("Storage failure: {0}")]
    Persistence(String),
}
