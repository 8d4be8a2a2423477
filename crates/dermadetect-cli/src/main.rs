mod classify;
mod display;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use dermadetect_ai::{LoadPolicy, ModelFiles, OnnxProvider};
use dermadetect_core::DetectionResponse;
use dermadetect_server::ServerConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dermadetect", version, about = "Skin lesion classification service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web front end and the /detect endpoint.
    Serve(ServeArgs),
    /// Classify a single image file and print the result.
    Classify(ClassifyArgs),
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// ONNX model definition.
    #[arg(long, env = "DERMADETECT_MODEL", default_value = "model.onnx")]
    model: PathBuf,
    /// External weights file, for models exported with external data.
    #[arg(long, env = "DERMADETECT_WEIGHTS")]
    weights: Option<PathBuf>,
}

impl ModelArgs {
    fn files(&self) -> ModelFiles {
        ModelFiles::new(&self.model, self.weights.clone())
    }
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "DERMADETECT_HOST", default_value = "127.0.0.1")]
    host: IpAddr,
    #[arg(long, env = "DERMADETECT_PORT", default_value_t = 3000)]
    port: u16,
    /// Load the model once and reuse it instead of reloading per request.
    #[arg(long, env = "DERMADETECT_CACHE_MODEL")]
    cache_model: bool,
    /// Largest accepted upload, in MiB.
    #[arg(long, env = "DERMADETECT_MAX_UPLOAD_MB", default_value_t = 16)]
    max_upload_mb: usize,
    #[command(flatten)]
    model: ModelArgs,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            addr: SocketAddr::new(self.host, self.port),
            max_upload_bytes: self.max_upload_mb * 1024 * 1024,
        }
    }
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Image to classify.
    image: PathBuf,
    /// Print a readable card instead of JSON.
    #[arg(long)]
    card: bool,
    #[command(flatten)]
    model: ModelArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Classify(args) => classify(args).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    info!("dermadetect v{}", env!("CARGO_PKG_VERSION"));

    let files = args.model.files();
    let policy = LoadPolicy::from_cache_flag(args.cache_model);
    if let Err(e) = files.check_exists() {
        // Per-request loading means the model may be dropped in later.
        warn!(error = %e, "model files not present yet; /detect will fail until they are");
    }
    info!(
        model = %files.definition.display(),
        policy = policy.as_str(),
        "classifier configured"
    );

    let provider = Arc::new(OnnxProvider::new(files, policy));
    dermadetect_server::serve(args.server_config(), provider).await
}

async fn classify(args: ClassifyArgs) -> anyhow::Result<()> {
    let provider = OnnxProvider::new(args.model.files(), LoadPolicy::PerRequest);
    let image = args.image.clone();
    let outcome =
        tokio::task::spawn_blocking(move || classify::classify_file(&provider, &image)).await??;

    if args.card {
        print!("{}", display::PredictionCard(&outcome.prediction));
    } else {
        let response = DetectionResponse::from(&outcome.prediction);
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    info!(elapsed_secs = outcome.elapsed_secs, "classification complete");
    Ok(())
}
