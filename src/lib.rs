pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod reporting;
pub mod schema;
pub mod store;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use store::Store;

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
        handlers::menu::list_menu_items,
        handlers::menu::list_menu_items_by_category,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::update_order_status,
        handlers::orders::recent_orders,
        handlers::reports::sales_metrics,
        handlers::reports::item_popularity,
        handlers::reports::sales_trend,
    ),
    tags(
        (name = "menu", description = "Menu catalog"),
        (name = "orders", description = "Order placement and tracking"),
        (name = "reports", description = "Sales reporting"),
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
    let store = Store::new(pool);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/menu-items")
                            .route("", web::get().to(handlers::menu::list_menu_items))
                            .route(
                                "/category/{category}",
                                web::get().to(handlers::menu::list_menu_items_by_category),
                            ),
                    )
                    .service(
                        web::scope("/orders")
                            .route("", web::post().to(handlers::orders::create_order))
                            .route(
                                "/recent/{limit}",
                                web::get().to(handlers::orders::recent_orders),
                            )
                            .route("/{id}", web::get().to(handlers::orders::get_order))
                            .route(
                                "/{id}/status",
                                web::patch().to(handlers::orders::update_order_status),
                            ),
                    )
                    .service(
                        web::scope("/reports")
                            .route(
                                "/sales-metrics",
                                web::post().to(handlers::reports::sales_metrics),
                            )
                            .route(
                                "/item-popularity",
                                web::post().to(handlers::reports::item_popularity),
                            )
                            .route(
                                "/sales-trend",
                                web::post().to(handlers::reports::sales_trend),
                            ),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
