mod chat;
mod health;
mod metrics;

pub use chat::{chat_handler, method_not_allowed};
pub use health::health_handler;
pub use metrics::metrics_handler;
