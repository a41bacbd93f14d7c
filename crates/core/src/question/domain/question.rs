use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::category::QuestionType;
use super::generation_error::GenerationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position within the assembled test.
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub text: String,
}

impl Question {
    pub fn new(number: u32, kind: QuestionType, text: impl Into<String>) -> Self {
        Self {
            number,
            kind,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub topic: String,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(topic: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            topic: topic.into(),
            questions,
        }
    }

    /// Renumbers the questions consecutively starting at `first`.
    pub fn renumber_from(&mut self, first: u32) {
        for (offset, q) in self.questions.iter_mut().enumerate() {
            q.number = first + offset as u32;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Survey,
    Unexpected,
    Roleplay,
    Advanced,
    Full15,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Survey,
        Mode::Unexpected,
        Mode::Roleplay,
        Mode::Advanced,
        Mode::Full15,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Survey => "survey",
            Mode::Unexpected => "unexpected",
            Mode::Roleplay => "roleplay",
            Mode::Advanced => "advanced",
            Mode::Full15 => "full15",
        }
    }

    /// Human-readable title used by the HTML preview.
    pub fn title(&self) -> &'static str {
        match self {
            Mode::Survey => "Survey",
            Mode::Unexpected => "Unexpected",
            Mode::Roleplay => "Role-play",
            Mode::Advanced => "Advanced",
            Mode::Full15 => "Full 15",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| GenerationError::InvalidMode(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub mode: Mode,
    /// Total number of questions across all sets.
    pub count: usize,
    pub sets: Vec<QuestionSet>,
}

impl GenerationResult {
    pub fn new(mode: Mode, sets: Vec<QuestionSet>) -> Self {
        let count = sets.iter().map(|s| s.questions.len()).sum();
        Self { mode, count, sets }
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sets.iter().flat_map(|s| s.questions.iter())
    }
}
