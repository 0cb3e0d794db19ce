use actix_web::web;

pub mod docs;
pub mod errors;
pub mod routes;

/// Registers every route. Expects a `web::Data<PersonService>` in the app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // `/person/search` must come before `/person/{id}`
    cfg.service(routes::person::find_by_name)
        .service(routes::person::find_by_id)
        .service(routes::person::find_all)
        .service(routes::person::create_person)
        .service(routes::person::update_person)
        .service(routes::person::delete_person)
        .service(routes::math::square_root)
        .service(docs::api_docs)
        .service(routes::math::binary_operation);
}
