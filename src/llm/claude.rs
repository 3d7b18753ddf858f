use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use crate::llm::provider::LLMProvider;

pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ClaudeMessage>,
}

#[derive(Serialize, Deserialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    error: Option<ClaudeError>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: Option<String>,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ClaudeError {
    message: String,
}

impl ClaudeProvider {
    pub fn new(api_key: String, config: &ClassifierConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LLMProvider for ClaudeProvider {
    async fn complete(&self, prompt: String) -> Result<String> {
        tracing::debug!("Sending {} chars to {}", prompt.len(), self.model);

        let request_body = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LLMApi(format!("API Error: {}", status.as_u16())));
        }

        let result: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse Claude response: {}", e)))?;

        if let Some(error) = result.error {
            return Err(Error::LLMApi(error.message));
        }

        Ok(concat_text_blocks(result.content))
    }

    fn name(&self) -> &str {
        "Claude"
    }
}

fn concat_text_blocks(blocks: Vec<ContentBlock>) -> String {
    blocks
        .into_iter()
        .filter(|c| c.content_type.as_deref() == Some("text"))
        .filter_map(|c| c.text)
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RiskClassifier;
    use crate::models::{RiskLevel, RiskStatus, UserRole};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    #[test]
    fn test_concat_skips_non_text_blocks() {
        let response: ClaudeResponse = serde_json::from_str(
            r#"{"content": [
                {"type": "text", "text": "{\"risk_level\": "},
                {"type": "tool_use", "id": "x"},
                {"text": "ignored"},
                {"type": "text", "text": "\"High\"}"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            concat_text_blocks(response.content),
            r#"{"risk_level": "High"}"#
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = ClaudeRequest {
            model: "m".to_string(),
            max_tokens: 1000,
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["max_tokens"], 1000);
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("system").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let config = ClassifierConfig {
            api_url: "http://127.0.0.1:9/v1/messages".to_string(),
            timeout: Duration::from_secs(2),
            ..ClassifierConfig::default()
        };
        let provider = ClaudeProvider::new("test-key".to_string(), &config).unwrap();
        let err = provider.complete("prompt".to_string()).await.unwrap_err();
        assert!(matches!(err, Error::LLMApi(_)));
    }

    #[test]
    fn test_model_comes_from_config() {
        let config = ClassifierConfig {
            model: "claude-test".to_string(),
            ..ClassifierConfig::default()
        };
        let provider = ClaudeProvider::new("test-key".to_string(), &config).unwrap();
        assert_eq!(provider.model(), "claude-test");
    }

    /// Serves exactly one HTTP response after `delay`, returning the endpoint URL.
    async fn serve_once(status_line: &'static str, body: String, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/v1/messages", addr)
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|l| l.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    return;
                }
            }
        }
    }

    async fn classify_against(url: String, timeout: Duration) -> (RiskStatus, String) {
        let config = ClassifierConfig {
            api_url: url,
            timeout,
            ..ClassifierConfig::default()
        };
        let provider = ClaudeProvider::new("test-key".to_string(), &config).unwrap();
        let classifier = RiskClassifier::new(provider);
        let result = classifier
            .classify_solution(
                "HR Screener",
                "Automated CV ranking for candidate shortlisting",
                UserRole::Deployer,
            )
            .await;
        (result.risk_ai, result.rationale)
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_error_outcome() {
        let url = serve_once(
            "529 Site Overloaded",
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#
                .to_string(),
            Duration::ZERO,
        )
        .await;

        let (status, rationale) = classify_against(url, Duration::from_secs(5)).await;
        assert_eq!(status, RiskStatus::Error);
        assert_eq!(rationale, "API Error: 529");
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_error_outcome() {
        let url = serve_once(
            "200 OK",
            r#"{"type":"error","error":{"type":"authentication_error","message":"bad key"}}"#
                .to_string(),
            Duration::ZERO,
        )
        .await;

        let (status, rationale) = classify_against(url, Duration::from_secs(5)).await;
        assert_eq!(status, RiskStatus::Error);
        assert_eq!(rationale, "bad key");
    }

    #[tokio::test]
    async fn test_fenced_success_is_classified() {
        let text = "```json\n{\"risk_level\": \"High\", \"rationale\": \"Annex III point 4: recruitment.\"}\n```";
        let body = serde_json::json!({
            "content": [{ "type": "text", "text": text }]
        })
        .to_string();
        let url = serve_once("200 OK", body, Duration::ZERO).await;

        let (status, rationale) = classify_against(url, Duration::from_secs(5)).await;
        assert_eq!(status, RiskStatus::Level(RiskLevel::High));
        assert_eq!(rationale, "Annex III point 4: recruitment.");
    }

    #[tokio::test]
    async fn test_slow_reply_times_out_as_error_outcome() {
        let body = serde_json::json!({
            "content": [{ "type": "text", "text": r#"{"risk_level": "Minimal", "rationale": "late"}"# }]
        })
        .to_string();
        let url = serve_once("200 OK", body, Duration::from_secs(3)).await;

        let (status, rationale) = classify_against(url, Duration::from_secs(1)).await;
        assert_eq!(status, RiskStatus::Error);
        assert!(rationale.starts_with("Failed to send request"), "{}", rationale);
    }
}
