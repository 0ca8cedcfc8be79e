// src/documents/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use models::*;
pub use routes::documents_routes;
