// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, favorite, profile, recipe},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public routes: register and login.
/// * Everything else sits behind the bearer-token middleware.
/// * Global middleware: Trace, CORS, and a body limit sized for image forms.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let public_routes = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login));

    let protected_routes = Router::new()
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route(
            "/api/recipes",
            get(recipe::list_recipes).post(recipe::create_recipe),
        )
        .route("/api/my-recipes", get(recipe::my_recipes))
        .route("/api/recipes/{id}", get(recipe::get_recipe))
        .route(
            "/api/recipes/{id}/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route("/api/recipes/{id}/is-favorite", get(favorite::is_favorite))
        .route("/api/favorites", get(favorite::list_favorites))
        .route("/api/verify-token", get(auth::verify_token))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Image forms go up to 5MB per file; leave headroom for the fields.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
