pub mod backend;
pub mod client;
pub mod error;
pub mod models;

pub use backend::PredictionBackend;
pub use client::SportsApi;
pub use error::FetchError;
pub use models::{Match, Prediction};
