use std::path::PathBuf;

/// Persists uploaded recordings under unique names.
///
/// `file_name` is the client-supplied name; only its extension is kept.
pub trait RecordingStore: Send {
    fn save(
        &self,
        file_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<PathBuf, Box<dyn std::error::Error>>;
}
