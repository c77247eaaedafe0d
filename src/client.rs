use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;

/// Read-only view of the Lichess API. Implementations guarantee valid JSON
/// or a descriptive error, never a particular schema.
#[async_trait]
pub trait Client {
    async fn get_user_profile(&self, username: &str) -> Result<Value, Error>;
    async fn get_leaderboards(&self) -> Result<Value, Error>;
    async fn get_tournaments(&self) -> Result<Value, Error>;
}
