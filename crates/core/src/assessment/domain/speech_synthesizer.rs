use crate::shared::constants::{DEFAULT_AUDIO_FORMAT, DEFAULT_VOICE};

/// Text to read aloud, with the voice and container format to use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: String,
    pub format: String,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: DEFAULT_VOICE.to_string(),
            format: DEFAULT_AUDIO_FORMAT.to_string(),
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// Domain interface for text-to-speech. Returns encoded audio bytes.
pub trait SpeechSynthesizer: Send {
    fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = SpeechRequest::new("Hello");
        assert_eq!(request.voice, "alloy");
        assert_eq!(request.format, "mp3");
    }

    #[test]
    fn test_overrides() {
        let request = SpeechRequest::new("Hello").with_voice("verse").with_format("wav");
        assert_eq!(request.voice, "verse");
        assert_eq!(request.format, "wav");
    }
}
