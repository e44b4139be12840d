//! Client for the Gemini `generateContent` REST API.

use base64::{Engine, engine::general_purpose::STANDARD};
use log::debug;
use mime::Mime;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

/// Output kinds the model is allowed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum ResponseModality {
    Text,
    Image,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<ResponseModality>,
}

/// Response body of a `generateContent` call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Absent when the candidate was blocked before producing anything
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single response segment: text, inline binary data, or both absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 encoded payload
    #[serde(default)]
    pub data: String,
}

impl InlineData {
    /// Decode the base64 payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.data.as_bytes())?)
    }

    /// File extension for this payload. Falls back to `png` for anything that
    /// is not an image MIME type.
    #[must_use]
    pub fn extension(&self) -> String {
        match self.mime_type.parse::<Mime>() {
            Ok(mime) if mime.type_() == mime::IMAGE => mime.subtype().as_str().to_string(),
            _ => "png".to_string(),
        }
    }
}

impl GenerateContentResponse {
    /// Keep the response for image unpacking unless it has no candidates.
    /// A candidate without any image part still counts as a response.
    fn into_image_response(self) -> Option<Self> {
        if self.candidates.is_empty() {
            debug!("Gemini returned no candidates for image request");
            return None;
        }
        Some(self)
    }

    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// First non-empty text segment of the first candidate.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.first_parts()
            .iter()
            .find_map(|part| part.text.as_deref().filter(|text| !text.is_empty()))
    }

    /// Inline data parts of the first candidate that actually carry a
    /// payload, paired with their index among all parts.
    pub fn inline_images(&self) -> impl Iterator<Item = (usize, &InlineData)> {
        self.first_parts()
            .iter()
            .enumerate()
            .filter_map(|(index, part)| {
                part.inline_data
                    .as_ref()
                    .filter(|inline| !inline.data.is_empty())
                    .map(|inline| (index, inline))
            })
    }
}

pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Generate a text-only response and return its first text segment.
    pub async fn generate_text(&self, prompt: &str, model_id: &str) -> Result<Option<String>> {
        let response = self
            .generate_content(prompt, model_id, vec![ResponseModality::Text])
            .await?;
        Ok(response.first_text().map(str::to_string))
    }

    /// Generate a response that may contain images. The whole response is
    /// returned since the caller needs every image part; `None` when the model
    /// produced no candidates at all.
    pub async fn generate_image(
        &self,
        prompt: &str,
        model_id: &str,
    ) -> Result<Option<GenerateContentResponse>> {
        let response = self
            .generate_content(
                prompt,
                model_id,
                vec![ResponseModality::Text, ResponseModality::Image],
            )
            .await?;

        Ok(response.into_image_response())
    }

    async fn generate_content(
        &self,
        prompt: &str,
        model_id: &str,
        modalities: Vec<ResponseModality>,
    ) -> Result<GenerateContentResponse> {
        debug!(
            "Sending request to Gemini model {model_id} ({} prompt characters, modalities {modalities:?})",
            prompt.chars().count()
        );

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: modalities,
            },
        };

        let url = format!("{}/models/{model_id}:generateContent", self.base_url);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::GeminiApi { status, message });
        }

        let api_response: GenerateContentResponse = response.json().await?;
        debug!(
            "Received response from Gemini with {} candidates",
            api_response.candidates.len()
        );
        Ok(api_response)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Accept one connection, capture the raw request and answer with
    /// `status_line` and `body`.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind local listener");
        let addr = listener.local_addr().expect("listener address");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept connection");
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).expect("valid response json")
    }

    #[test]
    fn request_uses_gemini_field_names() -> serde_json::Result<()> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec![ResponseModality::Text, ResponseModality::Image],
            },
        };

        let value = serde_json::to_value(&request)?;
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            value["generationConfig"]["responseModalities"],
            serde_json::json!(["TEXT", "IMAGE"])
        );
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_maps_to_api_error() {
        let (base_url, server) = serve_once("429 Too Many Requests", "slow").await;
        let client = GeminiClient::new("test-key".to_string(), base_url);

        let result = client.generate_text("hello", "test-model").await;
        let request = server.await.expect("server task");

        match result {
            Err(BotError::GeminiApi { status, message }) => {
                assert_eq!(status, reqwest::StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(message, "slow");
            }
            other => panic!("expected Gemini API error, got {other:?}"),
        }

        assert!(request.starts_with("POST /models/test-model:generateContent HTTP/1.1\r\n"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key\r\n"));
        assert!(request.contains(r#""responseModalities":["TEXT"]"#));
    }

    #[tokio::test]
    async fn image_request_asks_for_text_and_image() -> Result<()> {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"done"}]}}]}"#,
        )
        .await;
        let client = GeminiClient::new("test-key".to_string(), base_url);

        let response = client.generate_image("a cat", "image-model").await?;
        let request = server.await.expect("server task");

        assert!(response.is_some());
        assert!(request.starts_with("POST /models/image-model:generateContent "));
        assert!(request.contains(r#""responseModalities":["TEXT","IMAGE"]"#));
        Ok(())
    }

    #[test]
    fn first_text_skips_empty_segments() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"text":""},
                {"text":"こんにちは"},
                {"text":"second"}
            ]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(response.first_text(), Some("こんにちは"));
    }

    #[test]
    fn first_text_is_none_without_candidates() {
        assert_eq!(parse("{}").first_text(), None);
        assert_eq!(
            parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).first_text(),
            None
        );
    }

    #[test]
    fn inline_images_keep_part_indices() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"here you go"},
                {"inlineData":{"mimeType":"image/png","data":"iVBORw0KGgo="}},
                {"inlineData":{"mimeType":"image/png","data":""}},
                {"inlineData":{"mimeType":"image/jpeg","data":"/9j/4AAQ"}}
            ]}}]}"#,
        );

        let images: Vec<(usize, &InlineData)> = response.inline_images().collect();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].0, 1);
        assert_eq!(images[1].0, 3);
        assert_eq!(images[1].1.extension(), "jpeg");
    }

    #[test]
    fn text_only_response_has_no_images() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"no image"}]}}]}"#);
        assert_eq!(response.inline_images().count(), 0);
    }

    #[test]
    fn image_response_without_image_parts_is_still_a_response() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]}}]}"#)
            .into_image_response()
            .expect("candidate present");
        assert_eq!(response.inline_images().count(), 0);
    }

    #[test]
    fn image_response_without_candidates_is_absent() {
        assert!(parse(r#"{"candidates":[]}"#).into_image_response().is_none());
    }

    #[test]
    fn inline_data_decodes_base64() -> Result<()> {
        let inline = InlineData {
            mime_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
        };
        assert_eq!(inline.decode()?, b"hello");
        Ok(())
    }

    #[test]
    fn non_image_mime_falls_back_to_png() {
        let inline = InlineData {
            mime_type: "application/octet-stream".to_string(),
            data: String::new(),
        };
        assert_eq!(inline.extension(), "png");
    }
}
