use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be turned back into a `Track`.
    #[error("corrupt track row: {0}")]
    Corrupt(String),
}
