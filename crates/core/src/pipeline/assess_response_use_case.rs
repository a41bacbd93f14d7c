use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::assessment::domain::assessment::{Assessment, AssessmentRequest};
use crate::assessment::domain::recording_store::RecordingStore;
use crate::assessment::domain::response_assessor::ResponseAssessor;
use crate::assessment::domain::speech_transcriber::SpeechTranscriber;
use crate::shared::constants::DEFAULT_TARGET_LEN_SECS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssessError {
    #[error("recording is empty")]
    EmptyRecording,
    #[error("failed to save file: {0}")]
    Save(String),
    #[error("transcription failed: {0}")]
    Transcription(String),
    #[error("transcription failed: empty transcription")]
    EmptyTranscription,
    #[error("analyze failed: {0}")]
    Assessment(String),
}

/// A spoken answer as received from the learner.
#[derive(Clone, Debug, Default)]
pub struct RecordingUpload {
    /// Client-side file name; only its extension is used.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
    /// The question text the learner answered.
    pub prompt: Option<String>,
    pub target_len_sec: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssessmentReport {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub recording: PathBuf,
}

pub struct AssessResponseUseCase {
    store: Box<dyn RecordingStore>,
    transcriber: Box<dyn SpeechTranscriber>,
    assessor: Box<dyn ResponseAssessor>,
}

impl AssessResponseUseCase {
    pub fn new(
        store: Box<dyn RecordingStore>,
        transcriber: Box<dyn SpeechTranscriber>,
        assessor: Box<dyn ResponseAssessor>,
    ) -> Self {
        Self {
            store,
            transcriber,
            assessor,
        }
    }

    pub fn run(&self, upload: &RecordingUpload) -> Result<AssessmentReport, AssessError> {
        if upload.bytes.is_empty() {
            return Err(AssessError::EmptyRecording);
        }

        // 1. Persist the recording
        let recording = self
            .store
            .save(upload.file_name.as_deref(), &upload.bytes)
            .map_err(|e| AssessError::Save(e.to_string()))?;

        // 2. Speech to text
        let transcript = self
            .transcriber
            .transcribe(&recording)
            .map_err(|e| AssessError::Transcription(e.to_string()))?;
        if transcript.trim().is_empty() {
            log::error!("Empty transcription for {}", recording.display());
            return Err(AssessError::EmptyTranscription);
        }
        log::info!(
            "Transcribed {} ({} chars)",
            recording.display(),
            transcript.len()
        );

        // 3. Evaluate
        let request = AssessmentRequest::new(transcript)
            .with_prompt(upload.prompt.clone())
            .with_target_len_sec(upload.target_len_sec.unwrap_or(DEFAULT_TARGET_LEN_SECS));
        let assessment = self.assessor.assess(&request).map_err(|e| {
            log::error!("Assessment failed: {e}");
            AssessError::Assessment(e.to_string())
        })?;

        Ok(AssessmentReport {
            assessment,
            recording,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    // ─── Stubs ───

    struct StubStore {
        saved: Arc<Mutex<Vec<(Option<String>, usize)>>>,
    }

    impl RecordingStore for StubStore {
        fn save(
            &self,
            file_name: Option<&str>,
            bytes: &[u8],
        ) -> Result<PathBuf, Box<dyn std::error::Error>> {
            self.saved
                .lock()
                .unwrap()
                .push((file_name.map(str::to_string), bytes.len()));
            Ok(PathBuf::from("uploads/abcd1234.webm"))
        }
    }

    struct FailingStore;

    impl RecordingStore for FailingStore {
        fn save(&self, _: Option<&str>, _: &[u8]) -> Result<PathBuf, Box<dyn std::error::Error>> {
            Err("disk full".into())
        }
    }

    struct StubTranscriber {
        text: String,
    }

    impl SpeechTranscriber for StubTranscriber {
        fn transcribe(&self, _: &Path) -> Result<String, Box<dyn std::error::Error>> {
            Ok(self.text.clone())
        }
    }

    struct StubAssessor {
        seen: Arc<Mutex<Option<AssessmentRequest>>>,
    }

    impl ResponseAssessor for StubAssessor {
        fn assess(
            &self,
            request: &AssessmentRequest,
        ) -> Result<Assessment, Box<dyn std::error::Error>> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(Assessment {
                text: request.transcript.clone(),
                level_guess: "IM1".to_string(),
                ..Assessment::default()
            })
        }
    }

    struct FailingAssessor;

    impl ResponseAssessor for FailingAssessor {
        fn assess(&self, _: &AssessmentRequest) -> Result<Assessment, Box<dyn std::error::Error>> {
            Err("cannot parse assessment JSON".into())
        }
    }

    fn upload() -> RecordingUpload {
        RecordingUpload {
            file_name: Some("answer.webm".to_string()),
            bytes: vec![1, 2, 3],
            prompt: Some("Describe your house.".to_string()),
            target_len_sec: None,
        }
    }

    fn use_case(
        store: Box<dyn RecordingStore>,
        transcript: &str,
        assessor: Box<dyn ResponseAssessor>,
    ) -> AssessResponseUseCase {
        AssessResponseUseCase::new(
            store,
            Box::new(StubTranscriber {
                text: transcript.to_string(),
            }),
            assessor,
        )
    }

    #[test]
    fn test_saves_transcribes_and_assesses() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(None));
        let uc = use_case(
            Box::new(StubStore {
                saved: saved.clone(),
            }),
            "I live in an apartment.",
            Box::new(StubAssessor { seen: seen.clone() }),
        );

        let report = uc.run(&upload()).unwrap();
        assert_eq!(report.recording, PathBuf::from("uploads/abcd1234.webm"));
        assert_eq!(report.assessment.text, "I live in an apartment.");
        assert_eq!(report.assessment.level_guess, "IM1");

        assert_eq!(
            *saved.lock().unwrap(),
            vec![(Some("answer.webm".to_string()), 3)]
        );
        let request = seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.prompt.as_deref(), Some("Describe your house."));
        assert_eq!(request.target_len_sec, 60);
    }

    #[test]
    fn test_target_length_forwarded() {
        let seen = Arc::new(Mutex::new(None));
        let uc = use_case(
            Box::new(StubStore {
                saved: Arc::new(Mutex::new(Vec::new())),
            }),
            "text",
            Box::new(StubAssessor { seen: seen.clone() }),
        );
        let mut input = upload();
        input.target_len_sec = Some(120);
        uc.run(&input).unwrap();
        assert_eq!(seen.lock().unwrap().as_ref().unwrap().target_len_sec, 120);
    }

    #[test]
    fn test_empty_recording_rejected_before_saving() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let uc = use_case(
            Box::new(StubStore {
                saved: saved.clone(),
            }),
            "text",
            Box::new(FailingAssessor),
        );
        let mut input = upload();
        input.bytes.clear();
        assert_eq!(uc.run(&input).unwrap_err(), AssessError::EmptyRecording);
        assert!(saved.lock().unwrap().is_empty());
    }

    #[test]
    fn test_blank_transcript_is_error() {
        let seen = Arc::new(Mutex::new(None));
        let uc = use_case(
            Box::new(StubStore {
                saved: Arc::new(Mutex::new(Vec::new())),
            }),
            "  \n",
            Box::new(StubAssessor { seen: seen.clone() }),
        );
        assert_eq!(uc.run(&upload()).unwrap_err(), AssessError::EmptyTranscription);
        assert!(seen.lock().unwrap().is_none());
    }

    #[test]
    fn test_store_failure_reported() {
        let uc = use_case(Box::new(FailingStore), "text", Box::new(FailingAssessor));
        let err = uc.run(&upload()).unwrap_err();
        assert_eq!(err.to_string(), "failed to save file: disk full");
    }

    #[test]
    fn test_assessor_failure_reported() {
        let uc = use_case(
            Box::new(StubStore {
                saved: Arc::new(Mutex::new(Vec::new())),
            }),
            "text",
            Box::new(FailingAssessor),
        );
        let err = uc.run(&upload()).unwrap_err();
        assert!(matches!(err, AssessError::Assessment(_)));
        assert!(err.to_string().starts_with("analyze failed"));
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = AssessmentReport {
            assessment: Assessment {
                text: "hi".to_string(),
                ..Assessment::default()
            },
            recording: PathBuf::from("uploads/x.webm"),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["text"], "hi");
        assert_eq!(value["recording"], "uploads/x.webm");
    }
}
