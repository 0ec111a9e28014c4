//! Application state shared across handlers.

use std::sync::Arc;

use devrelay_core::RelayConfig;
use devrelay_telegram::MessagingGateway;

use crate::config::ApiConfig;
use crate::hub::ReporterHub;
use crate::scheduler::FollowUpScheduler;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ApiConfig>,
    /// Relay configuration, including the allow-list.
    pub relay: Arc<RelayConfig>,
    /// Outbound messaging.
    pub gateway: Arc<dyn MessagingGateway>,
    /// Owner of deferred follow-up deliveries.
    pub scheduler: Arc<FollowUpScheduler>,
    /// Real-time channel to telemetry reporters.
    pub hub: Arc<ReporterHub>,
}

impl AppState {
    pub fn new(config: ApiConfig, relay: RelayConfig, gateway: Arc<dyn MessagingGateway>) -> Self {
        Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
            gateway,
            scheduler: Arc::new(FollowUpScheduler::new()),
            hub: Arc::new(ReporterHub::default()),
        }
    }
}
