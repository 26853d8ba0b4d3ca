pub mod application;
pub mod auth;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::cart_service::CartService;
use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use domain::ports::{CartRepository, CatalogRepository, OrderRepository};
use domain::pricing::PricingConfig;
use infrastructure::cart_repo::DieselCartRepository;
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool
        .get()
        .expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Shared handler state: one service per bounded responsibility.
#[derive(Clone)]
pub struct AppState {
    pub carts: CartService,
    pub orders: OrderService,
    pub catalog: CatalogService,
}

impl AppState {
    /// Wire services over arbitrary repository implementations. Tests
    /// pass the in-memory store here.
    pub fn with_repos(
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogRepository>,
        pricing: PricingConfig,
    ) -> Self {
        AppState {
            carts: CartService::new(carts.clone()),
            orders: OrderService::new(orders, carts, pricing),
            catalog: CatalogService::new(catalog),
        }
    }

    /// Production wiring: Diesel repositories over the shared pool.
    pub fn postgres(pool: DbPool, pricing: PricingConfig) -> Self {
        Self::with_repos(
            Arc::new(DieselCartRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool.clone())),
            Arc::new(DieselCatalogRepository::new(pool)),
            pricing,
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::cart::get_cart,
        handlers::cart::add_to_cart,
        handlers::cart::update_cart_item,
        handlers::cart::remove_from_cart,
        handlers::cart::apply_coupon,
        handlers::cart::clear_cart,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::checkout,
        handlers::orders::update_order_status,
        handlers::catalog::list_kitchens,
        handlers::catalog::get_kitchen,
        handlers::catalog::list_plans,
        handlers::catalog::plans_by_kitchen,
    ),
    components(schemas(
        handlers::cart::AddItemRequest,
        handlers::cart::UpdateQuantityRequest,
        handlers::cart::ApplyCouponRequest,
        handlers::cart::CartItemResponse,
        handlers::cart::CartResponse,
        handlers::orders::GeoPointDto,
        handlers::orders::DeliveryAddressDto,
        handlers::orders::CheckoutRequest,
        handlers::orders::UpdateStatusRequest,
        handlers::orders::GeoPointResponse,
        handlers::orders::DeliveryAddressResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderResponse,
        handlers::catalog::KitchenResponse,
        handlers::catalog::PlanResponse,
    )),
    tags(
        (name = "cart", description = "Per-user cart"),
        (name = "orders", description = "Checkout and order lifecycle"),
        (name = "catalog", description = "Read-only kitchens and plans"),
    )
)]
pub struct ApiDoc;

/// Route table, shared between the real server and handler tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .route("", web::get().to(handlers::cart::get_cart))
            .route("", web::post().to(handlers::cart::add_to_cart))
            .route("", web::delete().to(handlers::cart::clear_cart))
            .route("/coupon", web::post().to(handlers::cart::apply_coupon))
            .route("/item/{item_id}", web::put().to(handlers::cart::update_cart_item))
            .route(
                "/item/{item_id}",
                web::delete().to(handlers::cart::remove_from_cart),
            ),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(handlers::orders::list_orders))
            .route("", web::post().to(handlers::orders::checkout))
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route(
                "/{id}/status",
                web::put().to(handlers::orders::update_order_status),
            ),
    )
    .service(
        web::scope("/kitchens")
            .route("", web::get().to(handlers::catalog::list_kitchens))
            .route("/{id}", web::get().to(handlers::catalog::get_kitchen)),
    )
    .service(
        web::scope("/plans")
            .route("", web::get().to(handlers::catalog::list_plans))
            .route(
                "/kitchen/{kitchen_id}",
                web::get().to(handlers::catalog::plans_by_kitchen),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing)
/// the returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
