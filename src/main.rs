use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use solace_backend::api::{ApiServer, ApiState};
use solace_backend::{AudioStore, Config, MurfTts, SpeechToText};

/// Solace - conversational therapy backend with voice support
#[derive(Parser)]
#[command(name = "solace", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "5001")]
    port: u16,

    /// Directory for generated and uploaded audio files
    #[arg(long, env = "AUDIO_DIR", default_value = "audios")]
    audio_dir: PathBuf,

    /// Directory with the bundled web UI
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize a sample reply and save it to the audio directory
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! I'm here whenever you want to talk.")]
        text: String,
    },
    /// Transcribe a local audio file and print the transcript
    TestTranscribe {
        /// Path to an MP3 or WAV file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,solace_backend=info",
        1 => "info,solace_backend=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let static_dir = cli.static_dir.exists().then(|| cli.static_dir.clone());
    let config = Config::load(cli.audio_dir.clone(), static_dir);

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestTts { text } => test_tts(&config, &text).await,
            Command::TestTranscribe { file } => test_transcribe(&config, &file).await,
        };
    }

    tracing::info!(
        port = cli.port,
        audio_dir = %config.audio_dir.display(),
        "starting solace backend"
    );

    let state = Arc::new(ApiState::from_config(&config)?);
    let server = ApiServer::new(state, cli.port, config.static_dir.clone());

    server.run().await?;

    Ok(())
}

/// Synthesize a sample and save it
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Synthesizing: \"{text}\"\n");

    let api_key = config
        .api_keys
        .murf
        .clone()
        .ok_or_else(|| anyhow::anyhow!("MURF_API_KEY not set"))?;
    let tts = MurfTts::new(api_key, config.voice.clone())?;

    let audio = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", audio.len());

    let store = AudioStore::new(&config.audio_dir)?;
    let path = store.save(&audio, "mp3").await?;

    println!("Saved spoken sample to {path}");
    Ok(())
}

/// Transcribe a local audio file
async fn test_transcribe(config: &Config, file: &Path) -> anyhow::Result<()> {
    println!("Transcribing {}...\n", file.display());

    let api_key = config
        .api_keys
        .deepgram
        .clone()
        .ok_or_else(|| anyhow::anyhow!("DEEPGRAM_API_KEY not set"))?;
    let stt = SpeechToText::new(api_key, config.voice.stt_model.clone())?;

    let audio = tokio::fs::read(file).await?;
    let transcript = stt.transcribe(audio).await?;

    println!("Transcript: {transcript}");
    Ok(())
}
