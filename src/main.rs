use std::{env, sync::Arc};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Router,
};
use dotenvy::dotenv;
use sea_orm::{Database, DatabaseConnection};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod entities;
mod error;
mod services;
mod text;

use auth::{optional_auth_middleware, JwtService};
use services::{
    AssociationService, BusinessService, CategoryService, SearchService, SuggestionService,
    UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub jwt_service: JwtService,
    pub user_service: UserService,
    pub category_service: CategoryService,
    pub business_service: BusinessService,
    pub association_service: AssociationService,
    pub suggestion_service: SuggestionService,
    pub search_service: SearchService,
}

async fn health() -> impl IntoResponse {
    "OK"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "annuaire=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
        warn!("JWT_SECRET not set, using default (not secure for production)");
        "default-secret-change-in-production".to_string()
    });
    let jwt_expiration_hours = env::var("JWT_EXPIRATION_HOURS")
        .unwrap_or_else(|_| "24".to_string())
        .parse::<i64>()
        .unwrap_or(24);
    let cors_origins = env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Connect to database
    info!("Connecting to database...");
    let db = Arc::new(Database::connect(&database_url).await?);
    info!("Database connected successfully");

    // Initialize services
    let jwt_service = JwtService::new(&jwt_secret, jwt_expiration_hours);
    let user_service = UserService::new(db.clone(), jwt_service.clone());
    let category_service = CategoryService::new(db.clone());
    let business_service = BusinessService::new(db.clone(), category_service.clone());
    let association_service = AssociationService::new(db.clone());
    let suggestion_service = SuggestionService::new(db.clone());
    let search_service = SearchService::new(db.clone());

    let app_state = AppState {
        db,
        jwt_service: jwt_service.clone(),
        user_service,
        category_service,
        business_service,
        association_service,
        suggestion_service,
        search_service,
    };

    // Setup CORS
    let cors = if cors_origins.trim() == "*" {
        warn!("CORS set to accept ANY origin (*) - only use in development!");
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::OPTIONS,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_credentials(true)
    };

    // Create router
    let app = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(api::user::register))
        .route("/auth/login", post(api::user::login))
        .route("/users", get(api::user::list_users))
        .route(
            "/businesses",
            get(api::business::list_businesses).post(api::business::create_business),
        )
        .route("/businesses/autocomplete", get(api::business::autocomplete))
        .route(
            "/businesses/suggestions",
            get(api::suggestion::list_suggestions).post(api::suggestion::create_suggestion),
        )
        .route(
            "/businesses/suggestions/{id}",
            get(api::suggestion::get_suggestion),
        )
        .route(
            "/businesses/{key}",
            get(api::business::get_business)
                .put(api::business::update_business)
                .delete(api::business::delete_business),
        )
        .route(
            "/businesses/{key}/tags",
            put(api::business::attach_tags).delete(api::business::detach_tags),
        )
        .route(
            "/businesses/{key}/payment-types",
            put(api::business::attach_payment_types).delete(api::business::detach_payment_types),
        )
        .route(
            "/businesses/{key}/update_status",
            patch(api::business::update_status),
        )
        .route(
            "/categories",
            get(api::category::list_categories).post(api::category::create_category),
        )
        .route(
            "/categories/{key}",
            get(api::category::get_category)
                .put(api::category::update_category)
                .delete(api::category::delete_category),
        )
        .route(
            "/categories/{key}/tree",
            get(api::category::get_category_tree),
        )
        .route(
            "/categories/{key}/children",
            get(api::category::get_category_children),
        )
        .route("/tags", get(api::tag::list_tags).post(api::tag::create_tag))
        .route(
            "/tags/{id}",
            get(api::tag::get_tag)
                .put(api::tag::update_tag)
                .delete(api::tag::delete_tag),
        )
        .route(
            "/payment-types",
            get(api::tag::list_payment_types).post(api::tag::create_payment_type),
        )
        .route(
            "/payment-types/{id}",
            get(api::tag::get_payment_type)
                .put(api::tag::update_payment_type)
                .delete(api::tag::delete_payment_type),
        )
        .layer(cors)
        .layer(middleware::from_fn_with_state(
            jwt_service,
            optional_auth_middleware,
        ))
        .with_state(app_state);

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server starting on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
