use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Topic split into zero segments; the update carries no addressable path.
    #[error("Malformed topic path: no segments")]
    MalformedPath,

    /// No node exists at the queried path.
    #[error("Topic not found: {0}")]
    NotFound(String),
}
