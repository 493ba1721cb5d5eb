use super::{Translate, TranslationRequest};
use crate::config::TranslatorConfig;
use crate::error::{TranslatorError, TranslatorResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// HTTP client for a LibreTranslate-compatible `/translate` endpoint
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateReply {
    translated_text: Option<String>,
    error: Option<String>,
}

impl HttpTranslator {
    pub fn new(config: &TranslatorConfig) -> TranslatorResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translate for HttpTranslator {
    async fn translate_one(&self, request: &TranslationRequest) -> TranslatorResult<String> {
        let body = TranslateBody {
            q: &request.text,
            source: &request.source_lang,
            target: &request.target_lang,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslatorError::Api(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let reply: TranslateReply = response.json().await?;

        if let Some(error) = reply.error {
            return Err(TranslatorError::Api(error));
        }

        match reply.translated_text {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(TranslatorError::Api(
                "response carried no translated text".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_omits_missing_api_key() {
        let body = TranslateBody {
            q: "hola",
            source: "es",
            target: "en",
            format: "text",
            api_key: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"q": "hola", "source": "es", "target": "en", "format": "text"})
        );
    }

    #[test]
    fn test_reply_parses_camel_case() {
        let reply: TranslateReply =
            serde_json::from_str(r#"{"translatedText": "hello"}"#).unwrap();
        assert_eq!(reply.translated_text.as_deref(), Some("hello"));
        assert!(reply.error.is_none());

        let reply: TranslateReply =
            serde_json::from_str(r#"{"error": "unsupported language"}"#).unwrap();
        assert_eq!(reply.error.as_deref(), Some("unsupported language"));
    }

    #[test]
    fn test_new_uses_configured_endpoint() {
        let mut config = TranslatorConfig::new("es", "en");
        config.endpoint = "http://127.0.0.1:9/translate".to_string();
        let translator = HttpTranslator::new(&config).unwrap();
        assert_eq!(translator.endpoint(), "http://127.0.0.1:9/translate");
    }
}
