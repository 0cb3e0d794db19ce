use std::str::FromStr;

use actix_web::{get, http::header::ContentType, web, HttpResponse};
use registry::math::operation::{evaluate, evaluate_square_root, ArithmeticOperation};

use crate::errors::ApiError;

/// JSON has no literal for non-finite numbers, they are written the way Jackson does
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{:?}", value)
    }
}

fn number_response(value: f64) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(format_number(value))
}

#[get("/squareRoot/{number}")]
pub async fn square_root(number: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let value = evaluate_square_root(&number)?;

    Ok(number_response(value))
}

#[get("/{operation}/{number_one}/{number_two}")]
pub async fn binary_operation(
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (operation, number_one, number_two) = path.into_inner();

    // Unknown operation names are simply unknown routes
    let operation = ArithmeticOperation::from_str(&operation).map_err(|_| ApiError::NotFound)?;

    let value = evaluate(operation, &number_one, &number_two)?;

    Ok(number_response(value))
}
