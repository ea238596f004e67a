//! Scangate command-line interface.
//!
//! `scangate serve` runs the forwarding gateway; `scangate process` drives
//! the upload-client state machine against a running gateway from the command
//! line, printing extracted text or saving the rectified artifact under its
//! suggested download name.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use scangate::{GatewayConfig, HttpGateway, Mode, ProcessingResult, SelectedFile, Session, api};

#[derive(Parser)]
#[command(name = "scangate", version, about = "Upload-forwarding gateway for document scanning and OCR")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the forwarding gateway
    Serve {
        /// IP address to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Base URL of the processing backend
        #[arg(short, long)]
        backend_url: Option<String>,

        /// Path to a scangate.toml config file (otherwise discovered)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Upload a document image and fetch the processing result
    Process {
        /// Document image to upload
        file: PathBuf,

        /// Processing mode
        #[arg(short, long, value_enum, default_value = "scan")]
        mode: ModeArg,

        /// Base URL of the gateway
        #[arg(short, long, default_value = "http://127.0.0.1:8000")]
        gateway_url: String,

        /// Directory to write the result into (defaults to the current
        /// directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Rectify the document image into a cleaned scan
    Scan,
    /// Extract recognized text
    Text,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Scan => Mode::Rectify,
            ModeArg::Text => Mode::ExtractText,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            backend_url,
            config,
        } => {
            let mut config = match config {
                Some(path) => GatewayConfig::from_toml_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => match GatewayConfig::discover()? {
                    Some(config) => {
                        tracing::info!("Loaded config from discovered scangate.toml");
                        config
                    }
                    None => GatewayConfig::default(),
                },
            }
            .with_env_overrides();

            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(backend_url) = backend_url {
                config.backend_url = backend_url;
            }

            api::serve(config).await?;
        }
        Commands::Process {
            file,
            mode,
            gateway_url,
            output_dir,
        } => {
            let mode = Mode::from(mode);
            let selected = SelectedFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let gateway = HttpGateway::new(gateway_url);
            let mut session = Session::new();
            session.select_file(selected);

            if !session.process(mode, &gateway).await {
                bail!("No file selected");
            }

            if let Some(failure) = session.last_failure() {
                match failure.status {
                    Some(status) => bail!("Processing failed ({}): {}", status, failure.details),
                    None => bail!("Processing failed: {}", failure.details),
                }
            }

            let download_name = session
                .download_name()
                .context("Gateway reported success but no result was recorded")?
                .to_string();
            let output_path = output_dir.unwrap_or_else(|| PathBuf::from(".")).join(&download_name);

            match session.result() {
                Some(ProcessingResult::Text { content, .. }) => {
                    println!("{content}");
                    tokio::fs::write(&output_path, content).await?;
                }
                Some(ProcessingResult::Artifact { resource, .. }) => {
                    let data = resource.data().context("Result resource was already released")?;
                    tokio::fs::write(&output_path, data.bytes()).await?;
                }
                None => bail!("Gateway reported success but no result was recorded"),
            }

            tracing::info!("Saved result to {}", output_path.display());
        }
    }

    Ok(())
}
