use std::path::Path;

/// Domain interface for speech-to-text transcription of a stored recording.
pub trait SpeechTranscriber: Send {
    fn transcribe(&self, audio_path: &Path) -> Result<String, Box<dyn std::error::Error>>;
}
