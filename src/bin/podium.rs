use std::{
    fs::File,
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use podium::{
    DatasetSource, FfmpegSink, FfmpegSinkOpts, FrameSink, FrameTiming, Player, PngSequenceSink,
    Race, RaceConfig, Rasterizer, SceneBuilder, SvgSequenceSink, SvgWriter, Theme,
    encode::{ffmpeg::ensure_parent_dir, sink::write_png},
};

#[derive(Parser, Debug)]
#[command(name = "podium", version, about = "Formula 1 constructor bar-chart race renderer")]
struct Cli {
    /// Race configuration JSON (every field optional).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Theme JSON: colors, titles and icon.
    #[arg(long, global = true)]
    theme: Option<PathBuf>,

    /// Log more (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dump the keyframes as JSON.
    Keyframes(KeyframesArgs),
    /// Render one settled keyframe as SVG or PNG.
    Frame(FrameArgs),
    /// Play the full race into SVG/PNG frames or an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct KeyframesArgs {
    /// Champions CSV: a local path or an http(s) URL.
    #[arg(long = "in")]
    input: String,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Champions CSV: a local path or an http(s) URL.
    #[arg(long = "in")]
    input: String,

    /// Keyframe index (0-based).
    #[arg(long)]
    keyframe: usize,

    /// Output path; `.png` is rasterized, anything else is written as SVG.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Champions CSV: a local path or an http(s) URL.
    #[arg(long = "in")]
    input: String,

    /// Output directory for frame sequences, or file path for MP4.
    #[arg(long)]
    out: PathBuf,

    /// Output format. Inferred from `--out` when omitted (`.mp4` or an SVG directory).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Emit one settled frame per keyframe instead of sampling transitions.
    #[arg(long)]
    per_keyframe: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Svg,
    Png,
    Mp4,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = read_config(cli.config.as_deref())?;
    let theme = read_theme(cli.theme.as_deref())?;
    let resources_dir = cli
        .theme
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    match cli.cmd {
        Command::Keyframes(args) => cmd_keyframes(args, &config),
        Command::Frame(args) => cmd_frame(args, &config, &theme, resources_dir),
        Command::Render(args) => cmd_render(args, &config, &theme, resources_dir),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<RaceConfig> {
    match path {
        Some(p) => RaceConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(RaceConfig::default()),
    }
}

fn read_theme(path: Option<&Path>) -> anyhow::Result<Theme> {
    match path {
        Some(p) => {
            Theme::from_json_file(p).with_context(|| format!("load theme '{}'", p.display()))
        }
        None => Ok(Theme::default()),
    }
}

fn load_race(input: &str, config: &RaceConfig) -> anyhow::Result<(Race, DatasetSource)> {
    let source = DatasetSource::parse(input);
    let race =
        Race::load(&source, config).with_context(|| format!("load dataset '{source}'"))?;
    Ok((race, source))
}

fn cmd_keyframes(args: KeyframesArgs, config: &RaceConfig) -> anyhow::Result<()> {
    let (race, _) = load_race(&args.input, config)?;
    match &args.out {
        Some(path) => {
            ensure_parent_dir(path)?;
            let f = File::create(path)
                .with_context(|| format!("create '{}'", path.display()))?;
            let mut out = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut out, race.keyframes())
                .with_context(|| "write keyframes JSON")?;
            out.flush()
                .with_context(|| format!("flush '{}'", path.display()))?;
            eprintln!("wrote {} keyframes to {}", race.keyframes().len(), path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, race.keyframes())
                .with_context(|| "write keyframes JSON")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn cmd_frame(
    args: FrameArgs,
    config: &RaceConfig,
    theme: &Theme,
    resources_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (race, source) = load_race(&args.input, config)?;
    let keyframe = race.keyframes().get(args.keyframe).with_context(|| {
        format!(
            "keyframe {} out of range (race has {})",
            args.keyframe,
            race.keyframes().len()
        )
    })?;

    let scene = SceneBuilder::new(
        race.layout(),
        theme,
        config.min_visible,
        config.transition.ease,
    )
    .settled(keyframe);
    let doc = SvgWriter::new(race.layout(), theme)?.write(&scene)?;

    ensure_parent_dir(&args.out)?;
    if has_extension(&args.out, "png") {
        let resources_dir = resources_dir.or_else(|| source.base_dir().map(Path::to_path_buf));
        write_png(&Rasterizer::new(resources_dir), &doc, &args.out)?;
    } else {
        std::fs::write(&args.out, doc.as_str())
            .with_context(|| format!("write svg '{}'", args.out.display()))?;
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(
    args: RenderArgs,
    config: &RaceConfig,
    theme: &Theme,
    resources_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (race, source) = load_race(&args.input, config)?;
    if race.is_empty() {
        eprintln!("dataset is empty; nothing to render");
        return Ok(());
    }

    let format = args.format.unwrap_or(if has_extension(&args.out, "mp4") {
        OutputFormat::Mp4
    } else {
        OutputFormat::Svg
    });
    let timing = if args.per_keyframe {
        FrameTiming::PerKeyframe
    } else {
        FrameTiming::Fps
    };
    let resources_dir = resources_dir.or_else(|| source.base_dir().map(Path::to_path_buf));

    let mut sink: Box<dyn FrameSink> = match format {
        OutputFormat::Svg => Box::new(SvgSequenceSink::new(&args.out)),
        OutputFormat::Png => Box::new(PngSequenceSink::new(
            &args.out,
            Rasterizer::new(resources_dir),
        )),
        OutputFormat::Mp4 => {
            let mut opts = FfmpegSinkOpts::new(&args.out);
            if let Some(bg) = theme.background {
                opts.background = bg;
            }
            Box::new(FfmpegSink::new(opts, Rasterizer::new(resources_dir)))
        }
    };

    let player = Player::new(&race, config, theme, timing)?;
    let stats = player
        .run(sink.as_mut())
        .with_context(|| format!("render race to '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} frames ({} keyframes) to {}",
        stats.frames,
        stats.transitions,
        args.out.display()
    );
    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
