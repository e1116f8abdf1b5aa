use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod home_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(home_routes::router())
        .merge(appointment_routes::router())
        .with_state(state)
}
