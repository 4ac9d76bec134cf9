//! Google Cloud Translation v2 (REST) 客户端

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{TranslateError, Translator};

pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com";

#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    endpoint: String,
    api_key: String,
    agent: ureq::Agent,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GoogleTranslator {
    pub fn new(api_key: impl Into<String>) -> Result<Self, TranslateError> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self, TranslateError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TranslateError::MissingCredentials);
        }
        let agent = ureq::AgentBuilder::new()
            .timeout_read(Duration::from_secs(30))
            .timeout_write(Duration::from_secs(30))
            .build();
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            agent,
        })
    }

    fn url(&self) -> String {
        format!("{}/language/translate/v2", self.endpoint)
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, target_locale: &str) -> Result<String, TranslateError> {
        let body = TranslateRequest { q: text, target: target_locale, format: "text" };
        let response = self
            .agent
            .post(&self.url())
            .query("key", &self.api_key)
            .send_json(&body)
            .map_err(map_ureq_error)?;

        let parsed: TranslateResponse = response
            .into_json()
            .map_err(|e| TranslateError::Response(e.to_string()))?;
        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| TranslateError::Response("translations 为空".into()))
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

fn map_ureq_error(err: ureq::Error) -> TranslateError {
    match err {
        ureq::Error::Status(status, response) => {
            let raw = response.into_string().unwrap_or_default();
            TranslateError::Status { status, message: error_message(&raw) }
        }
        ureq::Error::Transport(t) => TranslateError::Transport(t.to_string()),
    }
}

/// 从错误响应体中提取 `error.message`，失败时原样返回
fn error_message(raw: &str) -> String {
    serde_json::from_str::<ErrorResponse>(raw)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| raw.trim().to_string())
}
