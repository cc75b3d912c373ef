pub mod in_memory;

use crate::core::errors::SmartRentError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;

#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn record(&self, entry: AppLog) -> Result<(), SmartRentError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, SmartRentError>;
}
