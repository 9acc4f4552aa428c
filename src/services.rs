pub mod batch_runner;
pub mod geocode_service;
pub mod lightning_service;

pub use batch_runner::{BatchReport, BatchRunner};
pub use geocode_service::GeocodeService;
pub use lightning_service::{LightningService, LightningSummary};
