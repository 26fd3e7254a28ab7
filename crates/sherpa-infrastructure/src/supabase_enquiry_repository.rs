//! Enquiry persistence through Supabase's PostgREST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use sherpa_core::SherpaError;
use sherpa_core::config::{EnquirySettings, SupabaseSecret};
use sherpa_core::enquiry::{EnquiryRecord, EnquiryRepository};
use sherpa_core::error::Result;

/// Row shape of the enquiries table.
#[derive(Serialize)]
struct EnquiryRow<'a> {
    name: &'a str,
    phone: &'a str,
    travelers: Option<u32>,
    message: &'a str,
}

impl<'a> From<&'a EnquiryRecord> for EnquiryRow<'a> {
    fn from(record: &'a EnquiryRecord) -> Self {
        Self {
            name: &record.name,
            phone: &record.phone,
            travelers: record.travelers,
            message: &record.message,
        }
    }
}

/// Inserts one row per enquiry into `{url}/rest/v1/{table}`.
#[derive(Clone)]
pub struct SupabaseEnquiryRepository {
    client: Client,
    endpoint: String,
    anon_key: String,
}

impl SupabaseEnquiryRepository {
    pub fn new(secret: &SupabaseSecret, settings: &EnquirySettings) -> Result<Self> {
        if secret.url.trim().is_empty() || secret.anon_key.trim().is_empty() {
            return Err(SherpaError::config(
                "Supabase url and anon_key must both be set",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| SherpaError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                secret.url.trim_end_matches('/'),
                settings.table
            ),
            anon_key: secret.anon_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EnquiryRepository for SupabaseEnquiryRepository {
    async fn save(&self, record: &EnquiryRecord) -> Result<()> {
        tracing::debug!("[Supabase] Inserting enquiry into {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=minimal")
            .json(&EnquiryRow::from(record))
            .send()
            .await
            .map_err(|e| SherpaError::persistence(format!("Supabase request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Supabase error body".to_string());
            return Err(SherpaError::persistence(format!(
                "Supabase insert failed ({}): {}",
                status.as_u16(),
                body
            )));
        }

        tracing::info!("[Supabase] Enquiry stored ({})", status.as_u16());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(url: &str) -> SupabaseSecret {
        SupabaseSecret {
            url: url.to_string(),
            anon_key: "anon".to_string(),
        }
    }

    #[test]
    fn test_endpoint_joins_url_and_table() {
        let repo = SupabaseEnquiryRepository::new(
            &secret("https://demo.supabase.co/"),
            &EnquirySettings::default(),
        )
        .unwrap();
        assert_eq!(repo.endpoint(), "https://demo.supabase.co/rest/v1/enquiries");
    }

    #[test]
    fn test_blank_credentials_are_rejected() {
        let err = SupabaseEnquiryRepository::new(&secret("  "), &EnquirySettings::default())
            .err()
            .unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_row_keeps_null_travelers() {
        let record = EnquiryRecord {
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            travelers: None,
            message: String::new(),
        };
        let value = serde_json::to_value(EnquiryRow::from(&record)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "Asha", "phone": "9876543210", "travelers": null, "message": ""})
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_persistence_error() {
        let settings = EnquirySettings {
            timeout_secs: 2,
            ..Default::default()
        };
        let repo = SupabaseEnquiryRepository::new(&secret("http://127.0.0.1:9"), &settings).unwrap();
        let record = EnquiryRecord {
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            travelers: Some(2),
            message: String::new(),
        };

        let err = repo.save(&record).await.unwrap_err();
        assert!(err.is_persistence());
    }
}
