pub mod db;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod reconciliation;
pub mod schema;
pub mod stats;

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
        handlers::pending_items::list_pending_items,
        handlers::pending_items::get_pending_item_stats,
        handlers::pending_items::create_pending_item,
        handlers::pending_items::update_pending_item,
        handlers::pending_items::link_to_purchase,
        handlers::pending_items::mark_refunded,
        handlers::pending_items::delete_pending_item,
        handlers::purchases::process_received,
    ),
    components(schemas(
        handlers::pending_items::CreatePendingItemRequest,
        handlers::pending_items::UpdatePendingItemRequest,
        handlers::pending_items::LinkToPurchaseRequest,
        handlers::pending_items::MarkRefundedRequest,
        handlers::pending_items::PendingItemResponse,
        handlers::pending_items::ListPendingItemsResponse,
        handlers::pending_items::PendingItemStatsResponse,
        handlers::purchases::ProcessReceivedResponse,
    )),
    tags(
        (name = "pending-items", description = "Problem items awaiting reshipment or refund"),
        (name = "purchases", description = "Reconciliation callbacks for the purchasing flow"),
    )
)]
struct ApiDoc;

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
                web::scope("/pending-items")
                    .route(
                        "/stats",
                        web::get().to(handlers::pending_items::get_pending_item_stats),
                    )
                    .route("", web::get().to(handlers::pending_items::list_pending_items))
                    .route("", web::post().to(handlers::pending_items::create_pending_item))
                    .route(
                        "/{id}/link-to-purchase",
                        web::put().to(handlers::pending_items::link_to_purchase),
                    )
                    .route(
                        "/{id}/mark-refunded",
                        web::put().to(handlers::pending_items::mark_refunded),
                    )
                    .route(
                        "/{id}",
                        web::put().to(handlers::pending_items::update_pending_item),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(handlers::pending_items::delete_pending_item),
                    ),
            )
            .service(web::scope("/purchases").route(
                "/{id}/process-received",
                web::post().to(handlers::purchases::process_received),
            ))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
