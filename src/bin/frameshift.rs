use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use frameshift::{Pipeline, PipelineConfig, PipelineStatus, RouteStrategy};

#[derive(Parser, Debug)]
#[command(name = "frameshift", version, about = "Transform a video frame by frame")]
struct Cli {
    /// Input video.
    input: PathBuf,

    /// Output MP4 path.
    output: PathBuf,

    /// Mode: `4k-upscale`, `beauty-filter`, `video-filter` or `ai-upscale`.
    /// Anything else copies frames unchanged.
    mode: String,

    /// Pipeline config JSON. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// How named modes are routed.
    #[arg(long, value_enum)]
    strategy: Option<StrategyChoice>,

    /// External upscaler executable.
    #[arg(long)]
    upscaler_bin: Option<PathBuf>,

    /// Progress cadence in frames.
    #[arg(long)]
    progress_every: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyChoice {
    InProcess,
    AiWithFallback,
}

impl From<StrategyChoice> for RouteStrategy {
    fn from(c: StrategyChoice) -> Self {
        match c {
            StrategyChoice::InProcess => RouteStrategy::InProcess,
            StrategyChoice::AiWithFallback => RouteStrategy::AiWithFallback,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cfg = load_config(&cli)?;
    let mut pipeline = Pipeline::new(cfg)?;
    let res = pipeline.run(&cli.input, &cli.output, &cli.mode);

    match res.status {
        PipelineStatus::Success => {
            println!(
                "processed {} frames -> {}",
                res.frames_processed,
                res.output_path.display()
            );
            Ok(())
        }
        PipelineStatus::Failure { kind, reason } => {
            eprintln!(
                "failed after {} frames ({kind}): {reason}",
                res.frames_processed
            );
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut cfg = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        cfg.strategy = strategy.into();
    }
    if let Some(bin) = &cli.upscaler_bin {
        cfg.upscaler_bin = bin.clone();
    }
    if let Some(n) = cli.progress_every {
        cfg.progress_every = n;
    }
    Ok(cfg)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
