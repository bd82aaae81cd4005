use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid study id: {0:?}")]
    InvalidStudyId(String),
    #[error("study registered twice: {0}")]
    DuplicateStudy(String),
    #[error("unknown study: {0}")]
    UnknownStudy(String),
    #[error("row {index} is out of range (table has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
