pub mod error;
pub mod person;
