use super::assessment::{Assessment, AssessmentRequest};

/// Domain interface for judging a transcribed response.
pub trait ResponseAssessor: Send {
    fn assess(&self, request: &AssessmentRequest)
        -> Result<Assessment, Box<dyn std::error::Error>>;
}
