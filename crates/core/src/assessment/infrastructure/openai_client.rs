use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{multipart, Client, Response};
use serde_json::{json, Value};
use thiserror::Error;

use crate::assessment::domain::assessment::{
    parse_assessment, Assessment, AssessmentParseError, AssessmentRequest,
};
use crate::assessment::domain::response_assessor::ResponseAssessor;
use crate::assessment::domain::speech_synthesizer::{SpeechRequest, SpeechSynthesizer};
use crate::assessment::domain::speech_transcriber::SpeechTranscriber;

#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read recording {path}: {source}")]
    Recording {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("response contained no output text")]
    MissingOutputText,
    #[error("speech text must not be empty")]
    EmptyText,
    #[error(transparent)]
    Assessment(#[from] AssessmentParseError),
}

/// Connection and model settings for the hosted speech/LLM provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub api_key: String,
    pub transcribe_model: String,
    pub analyze_model: String,
    pub tts_model: String,
    pub timeout: Duration,
}

/// Blocking client for the transcription, responses and speech endpoints.
///
/// Every request carries the configured timeout. Non-2xx responses are
/// surfaced as [`OpenAiError::Status`] with the provider's body; nothing is
/// retried.
#[derive(Debug)]
pub struct OpenAiClient {
    http: Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Result<Self, OpenAiError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(OpenAiError::Client)?;
        Ok(Self { http, settings })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    pub fn transcribe_file(&self, audio_path: &Path) -> Result<String, OpenAiError> {
        let endpoint = self.endpoint("audio/transcriptions");
        let form = multipart::Form::new()
            .text("model", self.settings.transcribe_model.clone())
            .text("response_format", "json")
            .file("file", audio_path)
            .map_err(|e| OpenAiError::Recording {
                path: audio_path.to_path_buf(),
                source: e,
            })?;

        log::info!(
            "POST {endpoint} (model {}, {})",
            self.settings.transcribe_model,
            audio_path.display()
        );
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.settings.api_key)
            .multipart(form)
            .send()
            .map_err(|e| http_error(&endpoint, e))?;
        let body = read_json(&endpoint, response)?;
        Ok(body
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    pub fn assess_transcript(&self, request: &AssessmentRequest) -> Result<Assessment, OpenAiError> {
        let endpoint = self.endpoint("responses");
        let payload = json!({
            "model": self.settings.analyze_model,
            "input": [
                {"role": "system", "content": [{"type": "input_text", "text": request.system_prompt()}]},
                {"role": "user", "content": [{"type": "input_text", "text": request.user_prompt()}]},
            ],
        });

        log::info!("POST {endpoint} (model {})", self.settings.analyze_model);
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&payload)
            .send()
            .map_err(|e| http_error(&endpoint, e))?;
        let body = read_json(&endpoint, response)?;
        let output = extract_output_text(&body).ok_or(OpenAiError::MissingOutputText)?;
        parse_assessment(&request.transcript, &output).map_err(|e| {
            log::error!("Assessment output was not JSON: {}", e.raw);
            OpenAiError::from(e)
        })
    }

    pub fn synthesize_speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, OpenAiError> {
        if request.text.trim().is_empty() {
            return Err(OpenAiError::EmptyText);
        }
        let endpoint = self.endpoint("audio/speech");
        let payload = json!({
            "model": self.settings.tts_model,
            "voice": request.voice,
            "input": request.text,
            "response_format": request.format,
        });

        log::info!(
            "POST {endpoint} (model {}, voice {})",
            self.settings.tts_model,
            request.voice
        );
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&payload)
            .send()
            .map_err(|e| http_error(&endpoint, e))?;
        let response = check_status(&endpoint, response)?;
        let bytes = response.bytes().map_err(|e| http_error(&endpoint, e))?;
        log::info!("Received {} bytes of {} audio", bytes.len(), request.format);
        Ok(bytes.to_vec())
    }
}

impl SpeechTranscriber for OpenAiClient {
    fn transcribe(&self, audio_path: &Path) -> Result<String, Box<dyn std::error::Error>> {
        Ok(self.transcribe_file(audio_path)?)
    }
}

impl ResponseAssessor for OpenAiClient {
    fn assess(
        &self,
        request: &AssessmentRequest,
    ) -> Result<Assessment, Box<dyn std::error::Error>> {
        Ok(self.assess_transcript(request)?)
    }
}

impl SpeechSynthesizer for OpenAiClient {
    fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.synthesize_speech(request)?)
    }
}

/// Pulls the generated text out of a responses-API body.
///
/// Prefers the top-level `output_text`, then the first non-empty
/// `output[].content[]` entry of type `output_text` or `text`.
pub fn extract_output_text(body: &Value) -> Option<String> {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }
    body.get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|c| matches!(c.get("type").and_then(Value::as_str), Some("output_text" | "text")))
        .filter_map(|c| c.get("text").and_then(Value::as_str))
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

fn http_error(endpoint: &str, source: reqwest::Error) -> OpenAiError {
    OpenAiError::Http {
        endpoint: endpoint.to_string(),
        source,
    }
}

fn check_status(endpoint: &str, response: Response) -> Result<Response, OpenAiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(OpenAiError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

fn read_json(endpoint: &str, response: Response) -> Result<Value, OpenAiError> {
    let response = check_status(endpoint, response)?;
    let text = response.text().map_err(|e| http_error(endpoint, e))?;
    serde_json::from_str(&text).map_err(|e| OpenAiError::Decode {
        endpoint: endpoint.to_string(),
        source: e,
    })
}
