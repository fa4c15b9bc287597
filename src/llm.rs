//! Google Gemini `generateContent` client

use crate::{config::Gemini, log_internal};
use anyhow::{anyhow, Result};

/// Text generation backend.  Implemented by [`GeminiClient`]; tests substitute canned results.
#[serenity::async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse>;
}

/// LLM decoding settings
#[derive(Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 2000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockOnlyHigh,
}

#[derive(Clone, serde::Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Only block content the API rates as highly likely to be harmful.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: HarmBlockThreshold::BlockOnlyHigh,
    })
    .collect()
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: &'a GenerationConfig,
    safety_settings: &'a [SafetySetting],
}

#[derive(serde::Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(serde::Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: FinishReason,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

/// Why the model stopped generating
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    #[default]
    FinishReasonUnspecified,
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other,
    Language,
    Blocklist,
    ProhibitedContent,
    Spii,
    MalformedFunctionCall,
    /// A reason newer than this client
    #[serde(other)]
    Unknown,
}

impl FinishReason {
    /// Numeric value as defined by the API's protobuf enum, `None` for reasons this client does
    /// not know.
    pub fn code(self) -> Option<i32> {
        Some(match self {
            FinishReason::FinishReasonUnspecified => 0,
            FinishReason::Stop => 1,
            FinishReason::MaxTokens => 2,
            FinishReason::Safety => 3,
            FinishReason::Recitation => 4,
            FinishReason::Other => 5,
            FinishReason::Language => 6,
            FinishReason::Blocklist => 7,
            FinishReason::ProhibitedContent => 8,
            FinishReason::Spii => 9,
            FinishReason::MalformedFunctionCall => 10,
            FinishReason::Unknown => return None,
        })
    }

    pub fn is_stop(self) -> bool {
        self.code() == Some(1)
    }
}

impl Candidate {
    /// All text parts of the candidate, concatenated.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(serde::Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(serde::Deserialize)]
struct ApiError {
    message: String,
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Stateless Gemini client.  Built once at startup and shared by reference.
pub struct GeminiClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiClient {
    pub fn new(settings: &Gemini) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: generate_url(&settings.endpoint, &settings.model_name),
            api_key: settings.api_key.clone(),
            generation_config: GenerationConfig::default(),
            safety_settings: default_safety_settings(),
        }
    }
}

impl GeminiClient {
    /// The key travels in a header so that it never shows up in a logged URL.
    fn request(&self, body: &GenerateContentRequest) -> reqwest::RequestBuilder {
        self.http
            .post(&self.url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(body)
    }
}

fn generate_url(endpoint: &str, model_name: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model_name
    )
}

#[serenity::async_trait]
impl Generate for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: &self.generation_config,
            safety_settings: &self.safety_settings,
        };

        log_internal!("Sending request to {}... ", self.url);
        let response = self.request(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let response = response.json::<GenerateContentResponse>().await?;
        log_internal!(
            "Sending request to {}... done, {} candidate(s)",
            self.url,
            response.candidates.len()
        );

        Ok(response)
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(body) => anyhow!("Gemini API returned {}: {}", status, body.error.message),
        Err(_) => anyhow!("Gemini API returned {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_api_field_names() {
        let config = GenerationConfig::default();
        let safety = default_safety_settings();
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: &config,
            safety_settings: &safety,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["topK"], 1);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2000);
        assert_eq!(json["generationConfig"]["temperature"], 1.0);
        assert_eq!(json["generationConfig"]["topP"], 1.0);
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(
            json["safetySettings"][3]["category"],
            "HARM_CATEGORY_DANGEROUS_CONTENT"
        );
        assert_eq!(json["safetySettings"][0]["threshold"], "BLOCK_ONLY_HIGH");
    }

    #[test]
    fn response_parses_candidates() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "meow "}, {"text": "no"}], "role": "model"},
                "finishReason": "STOP",
                "index": 0,
                "safetyRatings": []
            }]
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert!(response.candidates[0].finish_reason.is_stop());
        assert_eq!(response.candidates[0].text(), "meow no");
    }

    #[test]
    fn blocked_prompt_has_no_candidates() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn unrecognized_finish_reason_is_not_stop() {
        let body = r#"{"candidates": [{"finishReason": "SOMETHING_NEW"}, {}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.candidates[0].finish_reason, FinishReason::Unknown);
        assert_eq!(response.candidates[0].finish_reason.code(), None);
        assert!(!response.candidates[0].finish_reason.is_stop());
        assert_eq!(
            response.candidates[1].finish_reason,
            FinishReason::FinishReasonUnspecified
        );
        assert!(!response.candidates[1].finish_reason.is_stop());
        assert_eq!(response.candidates[0].text(), "");
    }

    #[test]
    fn newer_block_reasons_keep_their_numbers() {
        let body = r#"{"candidates": [
            {"finishReason": "OTHER"},
            {"finishReason": "BLOCKLIST"},
            {"finishReason": "PROHIBITED_CONTENT"},
            {"finishReason": "SPII"}
        ]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let codes: Vec<_> = response
            .candidates
            .iter()
            .map(|c| c.finish_reason.code())
            .collect();
        assert_eq!(codes, [Some(5), Some(7), Some(8), Some(9)]);
    }

    #[test]
    fn api_errors_carry_the_server_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let err = api_error(reqwest::StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "Gemini API returned 400 Bad Request: API key not valid"
        );

        let err = api_error(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.to_string(), "Gemini API returned 502 Bad Gateway");
    }

    #[test]
    fn api_key_stays_out_of_the_url() {
        let client = GeminiClient::new(&Gemini {
            api_key: "SECRETKEY123".to_owned(),
            model_name: "gemini-pro".to_owned(),
            endpoint: "http://127.0.0.1:1".to_owned(),
        });
        let config = GenerationConfig::default();
        let request = GenerateContentRequest {
            contents: vec![],
            generation_config: &config,
            safety_settings: &[],
        };

        let built = client.request(&request).build().unwrap();
        assert!(!built.url().as_str().contains("SECRETKEY123"));
        assert_eq!(built.url().query(), None);
        assert_eq!(built.headers()[API_KEY_HEADER], "SECRETKEY123");
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        assert_eq!(
            generate_url("https://example.test/", "gemini-pro"),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
    }
}
