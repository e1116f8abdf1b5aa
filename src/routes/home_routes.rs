use axum::{Router, extract::State, response::Html, routing::get};

use crate::models::AppState;
use crate::views::render_page;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

/// Renders the appointment list and dialog. Pending toasts are shown once.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let notifications = state.store.take_notifications().await;
    let snapshot = state.store.snapshot().await;

    Html(render_page(&snapshot, &notifications))
}
