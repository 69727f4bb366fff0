use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::{redact_query, CoreError};
use crate::models::settings::Settings;
use super::traits::DataSource;

/// Serves both resources from a static HTTP root.
///
/// - Series: `{base_url}/{series_path}`
/// - Movers: `{base_url}/{movers_dir}/{YYYY-MM-DD}.json`
///
/// A missing movers snapshot (any non-success status) is reported as
/// `Ok(None)`. A non-success status for the series is an error.
pub struct HttpSource {
    client: Client,
    base_url: String,
    settings: Settings,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, settings: &Settings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings: settings.clone(),
        }
    }

    pub fn series_url(&self) -> String {
        self.join(&self.settings.series_path)
    }

    pub fn movers_url(&self, date: NaiveDate) -> String {
        self.join(&self.settings.movers_path(date))
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DataSource for HttpSource {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_series(&self) -> Result<Value, CoreError> {
        let url = self.series_url();
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: "HTTP".into(),
                message: format!("{} returned {status}", redact_query(&url)),
            });
        }

        resp.json().await.map_err(|e| CoreError::Api {
            provider: "HTTP".into(),
            message: format!("Failed to parse series response: {e}"),
        })
    }

    async fn fetch_movers(&self, date: NaiveDate) -> Result<Option<Value>, CoreError> {
        let url = self.movers_url(date);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            log::debug!("Movers snapshot for {date} not available ({status})");
            return Ok(None);
        }

        let body = resp.json().await.map_err(|e| CoreError::Api {
            provider: "HTTP".into(),
            message: format!("Failed to parse movers snapshot for {date}: {e}"),
        })?;
        Ok(Some(body))
    }
}
