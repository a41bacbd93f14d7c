pub mod file_recording_store;
pub mod openai_client;
