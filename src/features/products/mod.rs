pub mod dtos;
pub mod editor;
pub mod handlers;
pub mod list_state;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ProductService;
