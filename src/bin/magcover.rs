use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use magcover::{
    ColorScheme, CoverConfig, FileSource, FontRole, ImageBuffer, ImageSource, MedianCut, Orchestrator,
    Phrase, PrecomputedSaliency, Resample, SaliencyModel,
};

#[derive(Parser, Debug)]
#[command(name = "magcover", version, about = "Compose magazine covers from photographs")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cut out the subject, derive colors and render a cover PNG.
    Compose(ComposeArgs),
    /// Print the palette, unified text color and background tints of a cutout.
    Palette(PaletteArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input photograph.
    #[arg(long)]
    image: PathBuf,

    /// Precomputed saliency mask (grayscale image, any size).
    #[arg(long)]
    mask: PathBuf,

    /// Preview PNG output path.
    #[arg(long)]
    out: PathBuf,

    /// Also write a print-resolution PNG here.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Phrase list, one `headline;subtitle` per line.
    #[arg(long)]
    phrases: Option<PathBuf>,

    /// Use this headline instead of a random phrase.
    #[arg(long, requires = "subtitle")]
    headline: Option<String>,

    /// Subtitle paired with `--headline`.
    #[arg(long, requires = "headline")]
    subtitle: Option<String>,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mask resampling filter (overrides the configuration).
    #[arg(long, value_enum)]
    resample: Option<ResampleChoice>,

    /// Phrase picker seed (overrides the configuration).
    #[arg(long)]
    seed: Option<u64>,

    /// Masthead font file (overrides the configuration).
    #[arg(long)]
    font_masthead: Option<PathBuf>,

    /// Headline font file (overrides the configuration).
    #[arg(long)]
    font_headline: Option<PathBuf>,

    /// Subtitle font file (overrides the configuration).
    #[arg(long)]
    font_subtitle: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    /// Input photograph.
    #[arg(long)]
    image: PathBuf,

    /// Optional saliency mask; without one the whole photo is sampled.
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full scheme as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResampleChoice {
    Bilinear,
    Nearest,
}

impl From<ResampleChoice> for Resample {
    fn from(c: ResampleChoice) -> Self {
        match c {
            ResampleChoice::Bilinear => Resample::Bilinear,
            ResampleChoice::Nearest => Resample::Nearest,
        }
    }
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
        Command::Compose(args) => cmd_compose(args),
        Command::Palette(args) => cmd_palette(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<CoverConfig> {
    match path {
        Some(p) => CoverConfig::from_path(p).with_context(|| format!("load config '{}'", p.display())),
        None => Ok(CoverConfig::default()),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    if let Some(r) = args.resample {
        config.resample = r.into();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(p) = args.font_masthead {
        config.fonts.masthead = Some(p);
    }
    if let Some(p) = args.font_headline {
        config.fonts.headline = Some(p);
    }
    if let Some(p) = args.font_subtitle {
        config.fonts.subtitle = Some(p);
    }
    for role in FontRole::ALL {
        if config.fonts.get(role).is_none() {
            tracing::warn!(
                ?role,
                "no font configured; this text will be laid out but not drawn (pass --font-{})",
                format!("{role:?}").to_lowercase()
            );
        }
    }

    let model = PrecomputedSaliency::open(&args.mask)?;
    let phrases = match (&args.headline, &args.subtitle, &args.phrases) {
        (Some(h), Some(s), _) => vec![Phrase::new(h.as_str(), s.as_str())],
        (_, _, Some(path)) => magcover::load_phrases(path)?,
        _ => Vec::new(),
    };

    let extractor: MedianCut = config.color.median_cut;
    let mut orch = Orchestrator::new(config, model, extractor)?.with_phrases(phrases);
    orch.acquire(&mut FileSource::new(&args.image))
        .with_context(|| format!("compose cover from '{}'", args.image.display()))?;

    let preview = orch
        .session()
        .preview
        .as_ref()
        .context("pipeline finished without a preview")?;
    magcover::write_png(preview, &args.out)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(export_path) = &args.export {
        let frame = orch.export()?;
        magcover::write_png(&frame, export_path)?;
        eprintln!("wrote {}", export_path.display());
    }
    Ok(())
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let photo = FileSource::new(&args.image).acquire()?;
    let mut image = photo.clone();

    if let Some(mask_path) = &args.mask {
        let mut model = PrecomputedSaliency::open(mask_path)?;
        let input = magcover::ModelInput::from_image(&photo)?;
        let map = model.infer(&input)?;
        magcover::apply_mask_with(&mut image, &map, config.resample)?;
    }

    let extractor = config.color.median_cut;
    let scheme = ColorScheme::derive_for_cutout(&image, &photo, &extractor, &config.color)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&scheme)?);
    } else {
        print_scheme(&image, &scheme);
    }
    Ok(())
}

fn print_scheme(image: &ImageBuffer, scheme: &ColorScheme) {
    println!("image      {}x{}", image.width(), image.height());
    println!("palette    {}", scheme.font_palette.to_hex().join(" "));
    println!("unified    {}", scheme.unified.to_hex());
    for opt in scheme.font_options.iter().skip(1) {
        println!("font       {}", opt.css);
    }
    for opt in &scheme.background_options {
        println!("tint       {:<22} {}", opt.css, opt.color.to_hex());
    }
}
