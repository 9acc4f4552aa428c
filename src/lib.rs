pub mod api;
pub mod app;
pub mod bounds;
pub mod config;
pub mod export;
pub mod fetch_error;
pub mod fetcher;
pub mod geocode_fetcher;
pub mod map;
pub mod normalize;
pub mod services;
pub mod snapshot;
pub mod utils;
