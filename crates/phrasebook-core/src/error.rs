#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate phrase id: {0}")]
    DuplicateId(u32),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page size must be at least 1")]
    ZeroPageSize,
}

/// Rejected "go to page" input. Both variants render the same user-facing message.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JumpError {
    #[error("Please enter a page number between 1 and {total}.")]
    NotANumber { input: String, total: usize },

    #[error("Please enter a page number between 1 and {total}.")]
    OutOfRange { page: usize, total: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum DebounceError {
    #[error("Debouncer task has stopped")]
    Closed,
}
