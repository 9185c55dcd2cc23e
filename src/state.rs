use std::sync::Arc;

use crate::rate_limit::RateStore;
use crate::upstream::UpstreamClient;

// app's shared state

pub struct AppState {
    pub upstream: UpstreamClient,
    pub rate_limiter: Arc<dyn RateStore>,
}
