use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quotecard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overlay a quote onto one image.
    Edit(EditArgs),
    /// Pick a quote and a photo, then overlay them into a new file.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Background image.
    #[arg(long)]
    image: PathBuf,

    /// Quote text.
    #[arg(long)]
    quote: String,

    /// Author of the quote.
    #[arg(long)]
    author: String,

    /// Output image; the format follows the extension.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// JSON array of `{ "quote", "author", "category" }` records.
    #[arg(long)]
    quotes: PathBuf,

    /// Directory of background photos.
    #[arg(long)]
    images: PathBuf,

    /// Quote category to draw from.
    #[arg(long, default_value = "happiness")]
    category: String,

    /// Directory receiving the generated image.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// JSON compositor config; defaults are used for missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Randomize the backdrop alpha in 100..=230.
    #[arg(long)]
    random_alpha: bool,

    /// Seed for every random choice.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Edit(args) => cmd_edit(args),
        Command::Generate(args) => cmd_generate(args),
    }
}

fn make_compositor(style: &StyleArgs) -> anyhow::Result<quotecard::PhotoCompositor> {
    let mut config = match &style.config {
        Some(path) => quotecard::CompositorConfig::from_json_file(path)?,
        None => quotecard::CompositorConfig::default(),
    };
    if style.random_alpha {
        config.backdrop_alpha = quotecard::AlphaPolicy::random(style.seed);
    }
    Ok(quotecard::PhotoCompositor::new(config)?)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let mut compositor = make_compositor(&args.style)?;
    if let Some(parent) = args.out.parent() {
        ensure_dir(parent)?;
    }

    let report = compositor.edit(&args.image, &args.quote, &args.author, &args.out)?;
    eprintln!("wrote {}", report.output.display());
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut compositor = make_compositor(&args.style)?;
    let mut quotes = quotecard::QuoteFile::from_json_file(&args.quotes)?;
    let mut images = quotecard::ImageDir::scan(&args.images)?;
    if let Some(seed) = args.style.seed {
        quotes = quotes.with_seed(seed);
        images = images.with_seed(seed);
    }
    ensure_dir(&args.out_dir)?;

    let report = quotecard::generate(
        &mut compositor,
        &mut quotes,
        &mut images,
        &args.category,
        &args.out_dir,
    )?;
    println!("{}", report.output.display());
    eprintln!("wrote {}", report.output.display());
    Ok(())
}
