use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::error::ReportError;
use crate::models::CompanySettings;

/// Source of the letterhead printed on every document.
#[async_trait]
pub trait CompanySettingsProvider: Send + Sync {
    /// `Ok(None)` when no settings have been configured yet.
    async fn fetch(&self) -> Result<Option<CompanySettings>, ReportError>;
}

/// Reads the single `company_settings` row through a REST data API.
pub struct RestCompanySettings {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestCompanySettings {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl CompanySettingsProvider for RestCompanySettings {
    async fn fetch(&self) -> Result<Option<CompanySettings>, ReportError> {
        let url = format!("{}/rest/v1/company_settings?select=*&limit=1", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ReportError::Settings(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Company settings request failed: {} {}", status, body);
            return Err(ReportError::Settings(format!("status={} body={}", status, body)));
        }

        let rows: Vec<CompanySettings> = response
            .json()
            .await
            .map_err(|e| ReportError::Settings(format!("parse error: {}", e)))?;
        info!("🏢 Loaded {} company settings row(s)", rows.len());
        Ok(rows.into_iter().next())
    }
}

/// Fixed settings, for callers that already hold the letterhead.
pub struct StaticCompanySettings(pub Option<CompanySettings>);

#[async_trait]
impl CompanySettingsProvider for StaticCompanySettings {
    async fn fetch(&self) -> Result<Option<CompanySettings>, ReportError> {
        Ok(self.0.clone())
    }
}
