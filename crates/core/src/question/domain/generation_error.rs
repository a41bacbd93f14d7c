use thiserror::Error;

use super::question::Mode;

/// Failures of question generation. All are caused by incomplete bank data
/// or a bad request, never transient, so callers do not retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("question bank is empty")]
    EmptyBank,
    #[error("topic not found: {0}")]
    TopicNotFound(String),
    #[error("no 'description' questions for topic: {0}")]
    NoDescriptionQuestions(String),
    #[error("survey bank must contain at least 2 topics, found {found}")]
    InsufficientTopics { found: usize },
    #[error("no questions found for topic: {0}")]
    NoQuestionsForTopic(String),
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    #[error("topic listing is not available for mode: {0}")]
    UnsupportedTopicListing(Mode),
}
