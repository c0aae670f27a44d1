use thiserror::Error;

/// Errors surfaced by the store operations.
///
/// `InvalidTreeType` and `InsufficientBalance` are recoverable, user-facing
/// conditions; `Persistence` is a storage-collaborator failure that
/// propagates to the caller untouched. Nothing is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid tree type: {0}")]
    InvalidTreeType(String),

    #[error("You have insufficient balance to purchase a {tree_type} tree. Current balance: {balance:.2}, Tree price: {price:.2}")]
    InsufficientBalance {
        tree_type: String,
        balance: f64,
        price: f64,
    },

    #[error("Persistence unavailable: {0}")]
    Persistence(#[from] anyhow::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, StoreError>;
