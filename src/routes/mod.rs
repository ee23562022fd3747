pub mod children;
pub mod health;
pub mod incidents;
pub mod parents;

use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{middleware::auth::JwtSecret, AppState};

/// The full HTTP surface, ready to serve.
pub fn router(state: AppState) -> Router {
    let jwt_secret = JwtSecret(state.config.jwt_secret.clone());

    Router::new()
        .route("/", get(health::index))
        .route("/api/health", get(health::health_check))
        // Parents
        .route("/api/parents", get(parents::list_parents))
        .route("/api/parents/register", post(parents::register))
        .route("/api/parents/login", post(parents::login))
        .route("/api/parents/me", get(parents::me))
        .route("/api/parents/family-code/{code}", get(parents::get_by_family_code))
        .route("/api/parents/{id}", get(parents::get_parent).put(parents::update_profile))
        .route("/api/parents/{id}/children", get(parents::list_children))
        .route("/api/parents/{id}/incidents", get(parents::list_incidents))
        // Children
        .route("/api/children/login", post(children::child_login))
        .route("/api/children/connect", post(children::connect))
        .route("/api/children/add", post(children::add_child))
        .route("/api/children/{id}", get(children::get_child).delete(children::remove_child))
        .route("/api/children/{id}/status", put(children::update_status))
        .route("/api/children/{id}/incidents", get(children::list_incidents))
        // Incidents
        .route("/api/incidents", post(incidents::create_incident))
        .route("/api/incidents/{id}", get(incidents::get_incident).delete(incidents::remove_incident))
        .route("/api/incidents/{id}/status", put(incidents::update_status))
        .fallback(health::not_found)
        .layer(Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
