pub const SURVEY_BANK_FILE: &str = "basic_questions.json";
pub const UNEXPECTED_BANK_FILE: &str = "unexpected_questions.json";
pub const ROLEPLAY_BANK_FILE: &str = "roleplay_questions.json";
pub const ADVANCED_BANK_FILE: &str = "advanced_questions.json";

/// Per-set caps for the categories that follow the opening description.
pub const ROUTINE_CAP: usize = 1;
pub const COMPARISON_CAP: usize = 1;
pub const EXPERIENCE_CAP: usize = 2;

pub const DEFAULT_UNEXPECTED_COUNT: usize = 3;
pub const SURVEY_TOPIC_COUNT: usize = 2;
pub const SURVEY_QUESTIONS_PER_TOPIC: usize = 3;

pub const INTRO_TOPIC: &str = "INTRO";
pub const INTRO_TEXT: &str = "Let’s start the interview now. Tell me something about yourself.";

/// First question number of each block in the 15-question composite.
pub const FULL15_FIRST_SURVEY_START: u32 = 2;
pub const FULL15_SECOND_SURVEY_START: u32 = 5;
pub const FULL15_UNEXPECTED_START: u32 = 8;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TRANSCRIBE_MODEL: &str = "gpt-4o-mini-transcribe";
pub const DEFAULT_ANALYZE_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_TTS_MODEL: &str = "gpt-4o-mini-tts";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_TARGET_LEN_SECS: u32 = 60;
pub const DEFAULT_VOICE: &str = "alloy";
pub const DEFAULT_AUDIO_FORMAT: &str = "mp3";
pub const DEFAULT_RECORDING_EXTENSION: &str = ".webm";
