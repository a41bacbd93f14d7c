pub mod assessment;
pub mod recording_store;
pub mod response_assessor;
pub mod speech_synthesizer;
pub mod speech_transcriber;
