use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::model::error::DomainError;

use super::{arithmetic, validator::parse_numeric};

/// Binary operations addressable by name, e.g. `/substraction/5/3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ArithmeticOperation {
    Sum,
    Substraction,
    Multiplication,
    Division,
    Mean,
}

impl ArithmeticOperation {
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            ArithmeticOperation::Sum => arithmetic::sum(a, b),
            ArithmeticOperation::Substraction => arithmetic::difference(a, b),
            ArithmeticOperation::Multiplication => arithmetic::product(a, b),
            ArithmeticOperation::Division => arithmetic::quotient(a, b),
            ArithmeticOperation::Mean => arithmetic::mean(a, b),
        }
    }
}

/// Validates both raw inputs before any arithmetic runs.
pub fn evaluate(
    operation: ArithmeticOperation,
    number_one: &str,
    number_two: &str,
) -> Result<f64, DomainError> {
    let a = parse_numeric(number_one)?;
    let b = parse_numeric(number_two)?;

    Ok(operation.apply(a, b))
}

pub fn evaluate_square_root(number: &str) -> Result<f64, DomainError> {
    let a = parse_numeric(number)?;

    Ok(arithmetic::square_root(a))
}
