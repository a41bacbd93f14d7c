use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use opic_core::assessment::domain::speech_synthesizer::{SpeechRequest, SpeechSynthesizer};
use opic_core::assessment::infrastructure::file_recording_store::FileRecordingStore;
use opic_core::assessment::infrastructure::openai_client::OpenAiClient;
use opic_core::pipeline::assess_response_use_case::{AssessResponseUseCase, RecordingUpload};
use opic_core::pipeline::generate_questions_use_case::{
    GenerateQuestionsUseCase, GenerationRequest,
};
use opic_core::question::domain::question::Mode;
use opic_core::question::domain::random_source::RandomSource;
use opic_core::question::infrastructure::html_renderer::{render_error_html, render_result_html};
use opic_core::question::infrastructure::json_bank_loader::load_banks;
use opic_core::question::infrastructure::rng_random_source::RngRandomSource;
use opic_core::shared::config::AppConfig;

/// OPIc practice question sets and spoken-response assessment.
#[derive(Parser)]
#[command(name = "opic", version)]
struct Cli {
    /// Directory holding the four question bank JSON files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Seed for reproducible question sets.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a question set.
    Generate {
        /// survey, unexpected, roleplay, advanced or full15.
        #[arg(long)]
        mode: String,
        /// Number of questions (unexpected only; 0 or less means 3).
        #[arg(long, allow_negative_numbers = true)]
        n: Option<i64>,
        /// Pin the topic (unexpected and roleplay).
        #[arg(long)]
        topic: Option<String>,
        /// Output format: json or html.
        #[arg(long, default_value = "json")]
        format: String,
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List topic names for a mode.
    Topics {
        /// survey, unexpected or roleplay.
        #[arg(long)]
        mode: String,
    },
    /// Transcribe and assess a recorded answer.
    Assess {
        /// Recorded audio file.
        audio: PathBuf,
        /// The question the answer responds to.
        #[arg(long)]
        prompt: Option<String>,
        /// Target speaking length in seconds.
        #[arg(long, default_value = "60")]
        target_len_sec: u32,
    },
    /// Read text aloud into an audio file.
    Speak {
        text: String,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = "alloy")]
        voice: String,
        /// Audio container format, e.g. mp3 or wav.
        #[arg(long, default_value = "mp3")]
        format: String,
    },
    /// Write the effective configuration, minus the API key, to the user
    /// config file.
    InitConfig,
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut config = AppConfig::load()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    match cli.command {
        Command::Generate {
            ref mode,
            n,
            ref topic,
            ref format,
            ref output,
        } => {
            let mut request = GenerationRequest::new(mode.parse()?);
            if let Some(n) = n.filter(|n| *n > 0) {
                request = request.with_count(usize::try_from(n)?);
            }
            if let Some(topic) = topic {
                request = request.with_topic(topic.as_str());
            }
            run_generate(&config, cli.seed, &request, format, output.as_deref())
        }
        Command::Topics { ref mode } => {
            let use_case = build_generator(&config, cli.seed)?;
            for topic in use_case.list_topics(mode.parse()?)? {
                println!("{topic}");
            }
            Ok(())
        }
        Command::Assess {
            ref audio,
            ref prompt,
            target_len_sec,
        } => run_assess(&config, audio, prompt.clone(), target_len_sec),
        Command::Speak {
            ref text,
            ref output,
            ref voice,
            ref format,
        } => {
            let client = OpenAiClient::new(config.openai_settings()?)?;
            let request = SpeechRequest::new(text.as_str())
                .with_voice(voice.as_str())
                .with_format(format.as_str());
            let audio = client.synthesize(&request)?;
            fs::write(output, &audio)?;
            log::info!("Wrote {} bytes to {}", audio.len(), output.display());
            Ok(())
        }
        Command::InitConfig => {
            config.openai_api_key = None;
            let path = config.save()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn build_generator(
    config: &AppConfig,
    seed: Option<u64>,
) -> Result<GenerateQuestionsUseCase, Box<dyn std::error::Error>> {
    let banks = Arc::new(load_banks(&config.data_dir)?);
    let rng: Box<dyn RandomSource> = match seed {
        Some(seed) => Box::new(RngRandomSource::seeded(seed)),
        None => Box::new(RngRandomSource::from_entropy()),
    };
    Ok(GenerateQuestionsUseCase::new(banks, rng))
}

fn run_generate(
    config: &AppConfig,
    seed: Option<u64>,
    request: &GenerationRequest,
    format: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut use_case = build_generator(config, seed)?;
    let rendered = match (use_case.generate(request), format) {
        (Ok(result), "html") => render_result_html(&result),
        (Ok(result), _) => serde_json::to_string_pretty(&result)?,
        (Err(e), "html") => {
            // Write the error page, then fail.
            emit(&render_error_html(&e.to_string()), output)?;
            return Err(e.into());
        }
        (Err(e), _) => return Err(e.into()),
    };
    emit(&rendered, output)
}

fn run_assess(
    config: &AppConfig,
    audio: &Path,
    prompt: Option<String>,
    target_len_sec: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = config.openai_settings()?;
    let use_case = AssessResponseUseCase::new(
        Box::new(FileRecordingStore::new(&config.upload_dir)),
        Box::new(OpenAiClient::new(settings.clone())?),
        Box::new(OpenAiClient::new(settings)?),
    );
    let upload = RecordingUpload {
        file_name: audio
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string),
        bytes: fs::read(audio)?,
        prompt,
        target_len_sec: Some(target_len_sec),
    };
    let report = use_case.run(&upload)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn emit(text: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            log::info!("Output written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = &cli.data_dir {
        if !dir.is_dir() {
            return Err(format!("Data directory not found: {}", dir.display()).into());
        }
    }
    match &cli.command {
        Command::Generate { mode, format, .. } => {
            mode.parse::<Mode>()?;
            if format != "json" && format != "html" {
                return Err(format!("Format must be 'json' or 'html', got '{format}'").into());
            }
        }
        Command::Topics { mode } => {
            let mode: Mode = mode.parse()?;
            if matches!(mode, Mode::Advanced | Mode::Full15) {
                return Err(format!(
                    "Topics can be listed for survey, unexpected or roleplay, got '{mode}'"
                )
                .into());
            }
        }
        Command::Assess {
            audio,
            target_len_sec,
            ..
        } => {
            if !audio.is_file() {
                return Err(format!("Audio file not found: {}", audio.display()).into());
            }
            if *target_len_sec == 0 {
                return Err("Target length must be greater than 0".into());
            }
        }
        Command::Speak { text, .. } => {
            if text.trim().is_empty() {
                return Err("Text to speak must not be empty".into());
            }
        }
        Command::InitConfig => {}
    }
    Ok(())
}
