use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::shared::constants::DEFAULT_TARGET_LEN_SECS;

/// What the evaluator is asked to judge.
#[derive(Clone, Debug, PartialEq)]
pub struct AssessmentRequest {
    pub transcript: String,
    /// The question the learner was answering, if known.
    pub prompt: Option<String>,
    pub target_len_sec: u32,
}

impl AssessmentRequest {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            prompt: None,
            target_len_sec: DEFAULT_TARGET_LEN_SECS,
        }
    }

    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_target_len_sec(mut self, secs: u32) -> Self {
        self.target_len_sec = secs;
        self
    }

    pub fn system_prompt(&self) -> &'static str {
        "You are an OPIC-style evaluator for Korean EFL speakers. \
         Given a transcript, return ONLY JSON (no code fences). \
         Keys: summary, level_guess, metrics{wpm,filler_rate,grammar_issues,vocab_range,spk_len_sec}, tips[]."
    }

    pub fn user_prompt(&self) -> String {
        format!(
            "Topic/Prompt (optional): {}\nTarget speaking length (sec): {}\nTranscript:\n{}\nReturn ONLY JSON. No other text.",
            self.prompt.as_deref().unwrap_or("N/A"),
            self.target_len_sec,
            self.transcript
        )
    }
}

/// Speaking metrics reported by the evaluator.
///
/// Numeric fields accept numbers or numeric strings; anything else is
/// dropped rather than failing the whole assessment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakingMetrics {
    #[serde(default, deserialize_with = "lenient_number")]
    pub wpm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub filler_rate: Option<f64>,
    #[serde(default)]
    pub grammar_issues: Option<Value>,
    #[serde(default)]
    pub vocab_range: Option<Value>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub spk_len_sec: Option<f64>,
}

/// Structured proficiency assessment of one spoken response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// The transcript that was assessed.
    pub text: String,
    pub summary: String,
    pub level_guess: String,
    pub metrics: SpeakingMetrics,
    pub tips: Vec<String>,
}

#[derive(Error, Debug)]
#[error("cannot parse assessment JSON ({source})")]
pub struct AssessmentParseError {
    /// The model output as received, for diagnostics.
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Deserialize)]
struct RawAssessment {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    level_guess: String,
    #[serde(default)]
    metrics: SpeakingMetrics,
    #[serde(default)]
    tips: Vec<String>,
}

/// Parses the evaluator's output into an assessment of `transcript`.
///
/// Surrounding Markdown code fences are tolerated; missing keys default.
pub fn parse_assessment(transcript: &str, output: &str) -> Result<Assessment, AssessmentParseError> {
    let raw: RawAssessment =
        serde_json::from_str(strip_code_fences(output)).map_err(|e| AssessmentParseError {
            raw: output.to_string(),
            source: e,
        })?;
    Ok(Assessment {
        text: transcript.to_string(),
        summary: raw.summary,
        level_guess: raw.level_guess,
        metrics: raw.metrics,
        tips: raw.tips,
    })
}

fn strip_code_fences(output: &str) -> &str {
    let trimmed = output.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    match rest.split_once('\n') {
        // Drop an optional language tag on the opening fence line.
        Some((_, body)) => body.trim(),
        None => {
            let rest = rest.trim_start();
            rest.strip_prefix("json").unwrap_or(rest).trim()
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    })
}
