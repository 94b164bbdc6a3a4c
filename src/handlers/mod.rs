mod health;
mod metrics;
mod review;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use review::review_handler;
