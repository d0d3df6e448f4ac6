use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware,
    middleware::Next,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parts_market::config::AppConfig;
use parts_market::handlers::{
    auth::{login, register},
    chat::chat,
    garage_requests, offers, preferences, supplier_requests,
    vehicles::lookup_vehicle,
};
use parts_market::middleware::auth_middleware;

pub fn create_app(config: AppConfig) -> Router {
    let cors_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(header_val) => Some(header_val),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(cors_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .nest(
            "/api/auth",
            Router::new()
                .route("/register", post(register))
                .route("/login", post(login)),
        )
        .nest(
            "/api/vehicle",
            Router::new().route("/lookup", get(lookup_vehicle)),
        )
        .nest(
            "/api/chat",
            Router::new()
                .route("/", post(chat))
                .layer(middleware::from_fn_with_state(config.clone(), auth_middleware)),
        )
        .nest(
            "/api/garage",
            Router::new()
                .route(
                    "/requests",
                    get(garage_requests::get_requests).post(garage_requests::create_request),
                )
                .route("/requests/:id", get(garage_requests::get_request))
                .route("/requests/:id/close", put(garage_requests::close_request))
                .route("/offers/:id/status", put(offers::update_offer_status))
                .layer(middleware::from_fn_with_state(config.clone(), auth_middleware)),
        )
        .nest(
            "/api/supplier",
            Router::new()
                .route("/requests", get(supplier_requests::get_requests))
                .route("/requests/:id", get(supplier_requests::get_request))
                .route("/offers", get(offers::get_offers).post(offers::create_offer))
                .route(
                    "/preferences",
                    get(preferences::get_preferences).put(preferences::update_preferences),
                )
                .layer(middleware::from_fn_with_state(config.clone(), auth_middleware)),
        )
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(config)
        .layer(middleware::from_fn(
            |req: Request, next: Next| async move {
                tracing::info!("{} {}", req.method(), req.uri());
                let response = next.run(req).await;
                tracing::info!("Response status: {}", response.status());
                response
            },
        ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "parts_market=info,tower_http=info,sqlx=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().await?;

    sqlx::migrate!().run(&config.database_pool).await?;

    let addr = config.server_address();
    let app = create_app(config);

    tracing::info!("Starting parts-market server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
