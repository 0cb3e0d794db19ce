use actix_web::{get, HttpResponse};
use serde_json::{json, Value};

/// Static OpenAPI description of the HTTP surface
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.1",
        "info": {
            "title": "Person Hub API",
            "version": "v1",
            "description": "Arithmetic operations and person management",
            "license": {
                "name": "Apache 2.0",
                "url": "https://www.apache.org/licenses/LICENSE-2.0"
            }
        },
        "paths": {
            "/person": {
                "get": { "summary": "Finds all people" },
                "post": { "summary": "Creates a person, 409 if the e-mail is taken" },
                "put": { "summary": "Updates first name, last name, address and gender" }
            },
            "/person/{id}": {
                "get": { "summary": "Finds a person by id" },
                "delete": { "summary": "Deletes a person by id" }
            },
            "/person/search": {
                "get": { "summary": "Finds people by firstName and lastName" }
            },
            "/{operation}/{numberOne}/{numberTwo}": {
                "get": { "summary": "sum, substraction, multiplication, division or mean" }
            },
            "/squareRoot/{number}": {
                "get": { "summary": "Square root" }
            }
        }
    })
}

#[get("/v3/api-docs")]
pub async fn api_docs() -> HttpResponse {
    HttpResponse::Ok().json(openapi_document())
}
