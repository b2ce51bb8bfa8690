use axum::Router;
use axum::routing::post;

use crate::state::AppState;

pub mod deriver;
pub mod dto;
pub mod events;
pub mod handler;
pub mod model;
pub mod naming;
pub mod service;
pub mod task;

pub fn router() -> Router<AppState> {
    Router::new().route("/compress", post(handler::compress))
}
