pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::bills::create_bill,
        handlers::bills::update_bill,
        handlers::bills::get_bill,
        handlers::bills::list_bills,
        handlers::barcodes::issue_barcodes,
        handlers::barcodes::list_barcodes,
        handlers::scan::scan,
    ),
    tags(
        (name = "bills", description = "Shipment bill lifecycle"),
        (name = "barcodes", description = "Barcode issuance and assignment"),
        (name = "scan", description = "Scan-to-complete workflow"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/bills")
                    .route("", web::post().to(handlers::bills::create_bill))
                    .route("", web::get().to(handlers::bills::list_bills))
                    .route("/{id}", web::get().to(handlers::bills::get_bill))
                    .route("/{id}", web::patch().to(handlers::bills::update_bill)),
            )
            .service(
                web::scope("/barcodes")
                    .route("", web::post().to(handlers::barcodes::issue_barcodes))
                    .route("", web::get().to(handlers::barcodes::list_barcodes)),
            )
            .route("/scan", web::post().to(handlers::scan::scan))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
