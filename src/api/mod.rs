pub mod client;
pub mod models;

pub use client::{ClientError, ImageClient};
pub use models::FetcherConfig;
