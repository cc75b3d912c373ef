use crate::core::errors::SmartRentError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Action log kept in process memory, oldest entry first.
#[derive(Clone, Default)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn record(&self, entry: AppLog) -> Result<(), SmartRentError> {
        debug!("{} by {:?}", entry.action, entry.user_id);
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, SmartRentError> {
        Ok(self.entries.read().await.clone())
    }
}
