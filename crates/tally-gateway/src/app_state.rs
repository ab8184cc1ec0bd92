//! Shared application state for the tally gateway.
//!
//! Holds only read-only config and lock-free metrics; counter values are
//! never stored here.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::obs::metrics::TallyMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    metrics: TallyMetrics,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: TallyMetrics::default(),
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &TallyMetrics {
        &self.inner.metrics
    }

    /// Flip into draining: readiness fails from here on.
    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }
}
