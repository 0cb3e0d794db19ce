use thiserror::Error;

use crate::{consts::consts::PersonId, store::StoreError};

#[derive(Error, Debug)]
pub enum DomainError {
    // Arithmetic
    #[error("Please set a numeric value!")]
    InvalidNumericInput(String),

    // CRUD - GET / UPDATE / DELETE
    #[error("No records found for this ID!")]
    NotFound(Option<PersonId>),

    // CRUD - CREATE
    #[error("Person already exists with given e-mail {0}")]
    Conflict(String),

    // Infrastructure, not part of the domain taxonomy
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }
}
