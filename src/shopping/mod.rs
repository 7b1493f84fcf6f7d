pub mod aggregate;
pub mod aisles;
mod dto;
pub mod handlers;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod repo;
pub mod service;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
