use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::errors::CoreError;

/// Trait abstraction for where the series and movers resources come from.
///
/// The core only ever reads two JSON documents: the daily series and a
/// per-day movers snapshot. Sources return them undecoded; shape checks
/// happen in the services so every source is validated the same way.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DataSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the full daily series. Any failure is fatal for startup.
    async fn fetch_series(&self) -> Result<Value, CoreError>;

    /// Fetch the movers snapshot for `date`.
    ///
    /// `Ok(None)` means the snapshot does not exist (yet). That is an
    /// expected state for the current day, not an error.
    async fn fetch_movers(&self, date: NaiveDate) -> Result<Option<Value>, CoreError>;
}
