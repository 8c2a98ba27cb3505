//! The `parley` binary: configuration loading and the serve command.

use clap::{Parser, Subcommand};
use parley_core::{ParleyError, ParleyResult, Transcriber};
use parley_engine::{EngineConfig, OllamaEngine};
use parley_gateway::{GatewayServer, Orchestrator};
use parley_persona::{PersonaCatalog, PersonaSpec};
use parley_session::SessionStore;
use parley_speech::{
    HttpSynthesizer, HttpTranscriber, SttConfig, TtsConfig, WhisperCliTranscriber,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parley", about = "Parley — persona-driven conversation server")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "parley.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the conversation server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List the recognized persona scenarios
    Personas,
}

#[derive(Debug, Deserialize, Default)]
struct ParleyConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    speech: SpeechConfig,
    #[serde(default)]
    personas: Vec<PersonaSpec>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct SpeechConfig {
    #[serde(default)]
    stt: SttConfig,
    /// When set, transcribe by running this whisper CLI binary instead
    /// of calling the HTTP endpoint.
    #[serde(default)]
    stt_command: Option<String>,
    #[serde(default)]
    tts: TtsConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

fn parse_config(config_str: &str) -> ParleyResult<ParleyConfig> {
    toml::from_str(config_str).map_err(|e| ParleyError::Config(e.to_string()))
}

/// Reads the config file, falling back to defaults when it is absent.
/// Read failures surface as `Io`, malformed TOML as `Config`.
async fn load_config(path: &PathBuf) -> ParleyResult<ParleyConfig> {
    if !path.exists() {
        info!(path = %path.display(), "No config file, using defaults");
        return Ok(ParleyConfig::default());
    }
    let config_str = tokio::fs::read_to_string(path).await?;
    parse_config(&config_str)
        .inspect_err(|e| error!(path = %path.display(), error = %e, "Bad config file"))
}


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;

    let catalog = Arc::new(PersonaCatalog::builtin_with(config.personas));

    match cli.command {
        Commands::Personas => {
            for name in catalog.names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            let engine = Arc::new(OllamaEngine::new(config.engine));
            let store = Arc::new(SessionStore::new(catalog.clone(), engine));
            let transcriber: Arc<dyn Transcriber> = match config.speech.stt_command {
                Some(command) => Arc::new(WhisperCliTranscriber::new(
                    command,
                    config.speech.stt.model.clone(),
                )),
                None => Arc::new(HttpTranscriber::new(config.speech.stt)),
            };
            let orchestrator = Arc::new(Orchestrator::new(
                catalog.clone(),
                store,
                transcriber,
                Arc::new(HttpSynthesizer::new(config.speech.tts)),
            ));
            let app = GatewayServer::build(orchestrator, catalog);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
            info!(addr = %addr, "Parley listening");
            axum::serve(listener, app).await?;
            Ok(())
        }
    }
}
