pub mod model;
mod token;

pub use token::TokenVerifier;
