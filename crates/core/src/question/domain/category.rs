use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    ADVANCED_BANK_FILE, COMPARISON_CAP, EXPERIENCE_CAP, ROLEPLAY_BANK_FILE, ROUTINE_CAP,
    SURVEY_BANK_FILE, UNEXPECTED_BANK_FILE,
};

/// Question category of a survey/unexpected topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Description,
    Routine,
    Comparison,
    Experience,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Description,
        Category::Routine,
        Category::Comparison,
        Category::Experience,
    ];

    /// Categories drawn after the opening description, in candidate order.
    pub const FOLLOW_UPS: [Category; 3] =
        [Category::Routine, Category::Comparison, Category::Experience];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Description => "description",
            Category::Routine => "routine",
            Category::Comparison => "comparison",
            Category::Experience => "experience",
        }
    }

    /// Maximum number of questions of this category in one set.
    ///
    /// The description is placed once, in slot 1, and is never a candidate
    /// afterwards, so its cap is 1.
    pub fn cap(&self) -> usize {
        match self {
            Category::Description => 1,
            Category::Routine => ROUTINE_CAP,
            Category::Comparison => COMPARISON_CAP,
            Category::Experience => EXPERIENCE_CAP,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Numbered role-play (11-13) and advanced (14-15) question slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumberedSlot {
    S11,
    S12,
    S13,
    S14,
    S15,
}

impl NumberedSlot {
    pub const ROLEPLAY: [NumberedSlot; 3] = [NumberedSlot::S11, NumberedSlot::S12, NumberedSlot::S13];
    pub const ADVANCED: [NumberedSlot; 2] = [NumberedSlot::S14, NumberedSlot::S15];

    /// Position of this slot in the 15-question composite.
    pub fn number(&self) -> u32 {
        match self {
            NumberedSlot::S11 => 11,
            NumberedSlot::S12 => 12,
            NumberedSlot::S13 => 13,
            NumberedSlot::S14 => 14,
            NumberedSlot::S15 => 15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NumberedSlot::S11 => "11",
            NumberedSlot::S12 => "12",
            NumberedSlot::S13 => "13",
            NumberedSlot::S14 => "14",
            NumberedSlot::S15 => "15",
        }
    }
}

impl fmt::Display for NumberedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumberedSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumberedSlot::ROLEPLAY
            .into_iter()
            .chain(NumberedSlot::ADVANCED)
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| format!("unknown slot '{s}'"))
    }
}

/// The `type` of a generated question.
///
/// Serialized as the bare string the question banks use: `introduce`,
/// a category name, or a slot number such as `"12"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum QuestionType {
    Introduce,
    Category(Category),
    Slot(NumberedSlot),
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Introduce => "introduce",
            QuestionType::Category(c) => c.as_str(),
            QuestionType::Slot(s) => s.as_str(),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<QuestionType> for String {
    fn from(value: QuestionType) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for QuestionType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "introduce" {
            return Ok(QuestionType::Introduce);
        }
        if let Ok(c) = value.parse::<Category>() {
            return Ok(QuestionType::Category(c));
        }
        value
            .parse::<NumberedSlot>()
            .map(QuestionType::Slot)
            .map_err(|_| format!("unknown question type '{value}'"))
    }
}

/// Which of the four topic banks a document belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankKind {
    Survey,
    Unexpected,
    Roleplay,
    Advanced,
}

impl BankKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            BankKind::Survey => SURVEY_BANK_FILE,
            BankKind::Unexpected => UNEXPECTED_BANK_FILE,
            BankKind::Roleplay => ROLEPLAY_BANK_FILE,
            BankKind::Advanced => ADVANCED_BANK_FILE,
        }
    }

    /// Numbered slots a bank of this kind may contain. Empty for
    /// category-keyed banks.
    pub fn slots(&self) -> &'static [NumberedSlot] {
        match self {
            BankKind::Survey | BankKind::Unexpected => &[],
            BankKind::Roleplay => &NumberedSlot::ROLEPLAY,
            BankKind::Advanced => &NumberedSlot::ADVANCED,
        }
    }
}

impl fmt::Display for BankKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BankKind::Survey => "survey",
            BankKind::Unexpected => "unexpected",
            BankKind::Roleplay => "roleplay",
            BankKind::Advanced => "advanced",
        };
        f.write_str(name)
    }
}
