use actix_web::{delete, get, post, put, web, HttpResponse};
use registry::{
    consts::consts::PersonId, model::person::Person, service::person_service::PersonService,
};
use serde::Deserialize;

use crate::errors::{flatten, ApiError};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NameQuery {
    pub first_name: String,
    pub last_name: String,
}

#[get("/person/{id}")]
pub async fn find_by_id(
    service: web::Data<PersonService>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = PersonId(id.into_inner());

    let person = flatten(web::block(move || service.find_by_id(id)).await)
        .map_err(ApiError::into_not_found)?;

    Ok(HttpResponse::Ok().json(person))
}

#[get("/person/search")]
pub async fn find_by_name(
    service: web::Data<PersonService>,
    query: web::Query<NameQuery>,
) -> Result<HttpResponse, ApiError> {
    let NameQuery {
        first_name,
        last_name,
    } = query.into_inner();

    let people = flatten(web::block(move || service.find_by_name(&first_name, &last_name)).await)?;

    Ok(HttpResponse::Ok().json(people))
}

#[get("/person")]
pub async fn find_all(service: web::Data<PersonService>) -> Result<HttpResponse, ApiError> {
    let people = flatten(web::block(move || service.find_all()).await)?;

    Ok(HttpResponse::Ok().json(people))
}

#[post("/person")]
pub async fn create_person(
    service: web::Data<PersonService>,
    person: web::Json<Person>,
) -> Result<HttpResponse, ApiError> {
    let person = person.into_inner();

    let created = flatten(web::block(move || service.create(person)).await)?;

    Ok(HttpResponse::Ok().json(created))
}

#[put("/person")]
pub async fn update_person(
    service: web::Data<PersonService>,
    person: web::Json<Person>,
) -> Result<HttpResponse, ApiError> {
    let person = person.into_inner();

    let updated = flatten(web::block(move || service.update(person)).await)
        .map_err(ApiError::into_not_found)?;

    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/person/{id}")]
pub async fn delete_person(
    service: web::Data<PersonService>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = PersonId(id.into_inner());

    flatten(web::block(move || service.delete(id)).await)?;

    Ok(HttpResponse::NoContent().finish())
}
