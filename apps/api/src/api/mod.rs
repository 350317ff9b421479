// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod cors;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::{build_app, route_table, RouteTableError};
pub use state::AppState;
