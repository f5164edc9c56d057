use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "shotmark", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stamp an image with the overlays and save it under a resolved folder.
    Annotate(AnnotateArgs),
    /// Show where a destination would resolve to, without creating anything.
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug)]
struct AnnotateArgs {
    /// Input image (PNG, JPEG, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Destination folder as a user would type it (`~/Shots`, `Reports`, `D:\caps`).
    #[arg(long)]
    save_path: String,

    /// Output format: png, jpg/jpeg or pdf. Anything else saves a PNG.
    #[arg(long, default_value = "png")]
    format: String,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file for the overlays.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Watermark text (bottom-right).
    #[arg(long)]
    watermark: Option<String>,

    /// Copyright text (top-left).
    #[arg(long)]
    copyright: Option<String>,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Destination folder as a user would type it.
    path: String,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Annotate(args) => cmd_annotate(args),
        Command::Resolve(args) => cmd_resolve(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<shotmark::ShotConfig> {
    match path {
        Some(p) => shotmark::ShotConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(shotmark::ShotConfig::default()),
    }
}

fn cmd_annotate(args: AnnotateArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(font) = args.font {
        config.font_path = Some(font);
    }
    if let Some(watermark) = args.watermark {
        config.watermark = watermark;
    }
    if let Some(copyright) = args.copyright {
        config.copyright = copyright;
    }

    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let image = shotmark::ImageAsset::decode(&bytes)
        .with_context(|| format!("decode image '{}'", args.in_path.display()))?;

    let mut orchestrator = shotmark::Orchestrator::new(config)?;
    let saved = orchestrator.run(&args.save_path, image, &args.format)?;

    println!("{}", saved.saved_to.display());
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let orchestrator = shotmark::Orchestrator::new(config)?;
    let resolved = orchestrator.resolver().resolve(&args.path)?;

    println!(
        "{}\t{}",
        resolved.path().display(),
        if resolved.existed() { "exists" } else { "new" }
    );
    Ok(())
}
