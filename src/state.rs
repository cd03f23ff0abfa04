use std::sync::Arc;

use crate::business_logic::config::ScreenerConfig;
use crate::services::cache::ScanCache;
use crate::services::notifier::WebhookNotifier;
use crate::services::yahoo::YahooClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ScreenerConfig>,
    pub yahoo: Arc<YahooClient>,
    pub cache: Arc<ScanCache>,
    pub notifier: Arc<WebhookNotifier>,
}
