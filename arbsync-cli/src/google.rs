//! Google Cloud Translation (v2, basic) backend.

use std::time::Duration;

use arbsync::{BoxError, Language, Translator};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Translates through the Cloud Translation REST API with an API key.
///
/// # Invariants
/// - `endpoint` has no trailing slash.
pub struct GoogleTranslator {
    endpoint: String,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<TranslatedText>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedText {
    translated_text: String,
}

impl GoogleTranslator {
    pub fn new(api_key: String) -> Result<Self, String> {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string(), api_key)
    }

    pub fn with_endpoint(mut endpoint: String, api_key: String) -> Result<Self, String> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Cannot build HTTP client: {}", e))?;
        let trimmed_len = endpoint.trim_end_matches('/').len();
        endpoint.truncate(trimmed_len);
        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &Language,
        target: &Language,
    ) -> Result<String, BoxError> {
        debug!(
            source = source.translator_code,
            target = target.translator_code,
            chars = text.chars().count(),
            "calling Cloud Translation"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&TranslateRequest {
                q: text,
                source: source.translator_code,
                target: target.translator_code,
                format: "text",
            })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err("translation API rejected the API key".into());
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(format!("translation API error: status {status}: {body}").into());
            }
        }

        let payload: TranslateResponse = response.json().await?;
        payload
            .data
            .translations
            .into_iter()
            .next()
            .map(|translation| translation.translated_text)
            .ok_or_else(|| "translation API returned no translations".into())
    }
}
