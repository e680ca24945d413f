use crate::config::toml_config::GatewayConfig;
use crate::domain::model::ProjectDetails;
use crate::domain::ports::LicenseClient;
use crate::utils::error::{Result, SetupError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// 更新閘道的 HTTP 客戶端
#[derive(Debug, Clone)]
pub struct UpdateGateway {
    client: Client,
    base_url: String,
    composer_url: String,
}

impl UpdateGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("cms-installer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            composer_url: config.composer_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, uri: &str) -> String {
        format!("{}/{}", self.base_url, uri.trim_start_matches('/'))
    }

    /// POST 表單到閘道並解析 JSON 回應
    async fn request_server_data(
        &self,
        uri: &str,
        form: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        let url = self.endpoint(uri);
        tracing::debug!("🌐 POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("🌐 Gateway response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SetupError::Gateway {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["error", "message"]
                .iter()
                .find_map(|field| json.get(field).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        })
}

#[async_trait]
impl LicenseClient for UpdateGateway {
    async fn request_project_details(&self, license_key: &str) -> Result<ProjectDetails> {
        let data = self
            .request_server_data("project/detail", &[("id", license_key)])
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    fn composer_url(&self, with_protocol: bool) -> String {
        if with_protocol {
            return self.composer_url.clone();
        }

        match self.composer_url.split_once("://") {
            Some((_, rest)) => rest.to_string(),
            None => self.composer_url.clone(),
        }
    }
}
