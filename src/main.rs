use std::io;

use actix_cors::Cors;
use actix_web::{
    middleware::{self, Condition},
    web, App, HttpServer,
};
use clap::{Parser, ValueEnum};
use num_format::{Locale, ToFormattedString};
use registry::{
    options::RegistryOptions,
    service::person_service::PersonService,
    store::{PgConfig, StorageEngine},
};

#[derive(ValueEnum, Clone, Debug)]
enum Storage {
    Memory,
    Postgres,
}

/// 📇 Person Hub, a small HTTP API for managing people and doing arithmetic
#[derive(Parser, Debug)]
struct Cli {
    /// Port the http server will run on
    #[clap(short, long, default_value = "8080")]
    port: u16,

    /// Address the http server will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    address: String,

    /// Logs every http request
    #[clap(long)]
    log_http: bool,

    #[clap(long, default_value_t = 2)]
    http_workers: usize,

    /// Where people are stored
    #[clap(short, long, value_enum, default_value_t = Storage::Memory)]
    storage: Storage,

    /// Connection string used with `--storage postgres`
    #[clap(
        long,
        env = "DATABASE_URL",
        default_value = "host=localhost user=postgres password=postgres"
    )]
    postgres_url: String,

    /// Removes every stored person on start
    #[clap(long)]
    reset: bool,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let storage_engine = match args.storage {
        Storage::Memory => StorageEngine::Memory,
        Storage::Postgres => StorageEngine::Postgres(PgConfig::new(args.postgres_url.clone())),
    };

    log::info!("Storage engine: [{}]", storage_engine.name());

    let options = RegistryOptions::default()
        .set_storage_engine(storage_engine)
        .set_reset(args.reset);

    let store = StorageEngine::get_engine(&options)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let service = web::Data::new(PersonService::new(store));

    let people = service
        .count()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    log::info!(
        "📀 Data [People: {}]",
        people.to_formatted_string(&Locale::en)
    );

    log::info!("starting HTTP server on {}:{}", args.address, args.port);

    let log_http = args.log_http;

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .configure(personhub::configure)
            .wrap(Cors::permissive())
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await
}
