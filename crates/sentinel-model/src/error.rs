use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown period '{0}' (expected daily, weekly, monthly or quarterly)")]
    UnknownPeriod(String),
    #[error("unknown field role '{0}' (expected responsible, category, state or date)")]
    UnknownFieldRole(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
