pub mod math;
pub mod person;
