use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::IssueTrackerService;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
}

impl AppContext {
    pub fn new(config: AppConfig, issue_tracker: Arc<dyn IssueTrackerService>) -> Self {
        Self {
            config,
            issue_tracker,
        }
    }
}
