use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lorereel::{
    CancelToken, ComposeConfig, ComposeRequest, MediaAsset, artifact_file_name, compose_video,
    plan_render, probe_media, render_args,
};

#[derive(Parser, Debug)]
#[command(name = "lorereel", version)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset (overrides `logging.level`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a video from images, narration and a script (requires `ffmpeg` and `ffprobe`).
    Compose(ComposeArgs),
    /// Print a media file's duration and streams (requires `ffprobe`).
    Probe(ProbeArgs),
    /// Print the filter graph and `ffmpeg` arguments without rendering.
    Graph(GraphArgs),
    /// Print the caption schedule extracted from a script.
    Captions(CaptionsArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Video title, used in the output file name.
    #[arg(long)]
    title: String,

    /// Script text file.
    #[arg(long)]
    script: PathBuf,

    /// Narration audio file.
    #[arg(long)]
    audio: PathBuf,

    /// Image files in display order.
    #[arg(long = "image", required = true, num_args = 1..)]
    images: Vec<PathBuf>,

    /// Skip the delivery re-encode.
    #[arg(long)]
    no_optimize: bool,

    /// Kill any single tool invocation after this many seconds.
    #[arg(long)]
    timeout_sec: Option<f64>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Media file to inspect.
    path: PathBuf,
}

#[derive(Parser, Debug)]
struct GraphArgs {
    /// Narration length in seconds; probed from `--audio` when omitted.
    #[arg(long)]
    duration: Option<f64>,

    /// Narration audio file.
    #[arg(long)]
    audio: PathBuf,

    /// Image files in display order.
    #[arg(long = "image", required = true, num_args = 1..)]
    images: Vec<PathBuf>,

    /// Script text file for captions.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Title used for the output file name.
    #[arg(long, default_value = "preview")]
    title: String,
}

#[derive(Parser, Debug)]
struct CaptionsArgs {
    /// Script text file.
    #[arg(long)]
    script: PathBuf,

    /// Narration length in seconds the captions are spread over.
    #[arg(long)]
    duration: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = match cli.config.as_deref() {
        Some(path) => ComposeConfig::load(path)?,
        None => ComposeConfig::default(),
    };
    init_tracing(cli.log_level.as_deref().unwrap_or(&cfg.logging.level));

    match cli.cmd {
        Command::Compose(args) => cmd_compose(args, cfg),
        Command::Probe(args) => cmd_probe(args, &cfg),
        Command::Graph(args) => cmd_graph(args, &cfg),
        Command::Captions(args) => cmd_captions(args, &cfg),
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_script(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read script '{}'", path.display()))
}

fn cmd_compose(args: ComposeArgs, mut cfg: ComposeConfig) -> anyhow::Result<()> {
    if args.no_optimize {
        cfg.optimize.enabled = false;
    }
    if args.timeout_sec.is_some() {
        cfg.tools.timeout_sec = args.timeout_sec;
    }

    let req = ComposeRequest {
        title: args.title,
        script: read_script(&args.script)?,
        media: MediaAsset {
            images: args.images,
            audio: args.audio,
        },
    };
    let artifact = compose_video(&req, &cfg, &CancelToken::new())?;

    eprintln!("wrote {} ({} bytes)", artifact.path.display(), artifact.size_bytes);
    println!("{}", artifact.path.display());
    Ok(())
}

fn cmd_probe(args: ProbeArgs, cfg: &ComposeConfig) -> anyhow::Result<()> {
    let run = lorereel::encode::process::RunOpts::new(CancelToken::new(), cfg.tools.timeout_sec)?;
    let info = probe_media(&args.path, &cfg.tools, &run)?;
    match info.duration_sec {
        Some(d) => println!("duration_sec: {d:.3}"),
        None => println!("duration_sec: unknown"),
    }
    println!("has_video: {}", info.has_video);
    println!("has_audio: {}", info.has_audio);
    Ok(())
}

fn cmd_graph(args: GraphArgs, cfg: &ComposeConfig) -> anyhow::Result<()> {
    let narration_sec = match args.duration {
        Some(d) => d,
        None => {
            let run =
                lorereel::encode::process::RunOpts::new(CancelToken::new(), cfg.tools.timeout_sec)?;
            lorereel::probe_duration(&args.audio, &cfg.tools, &run)?
        }
    };
    let script = match args.script.as_deref() {
        Some(path) => read_script(path)?,
        None => String::new(),
    };

    let req = ComposeRequest {
        title: args.title,
        script,
        media: MediaAsset {
            images: args.images,
            audio: args.audio,
        },
    };
    let plan = plan_render(&req, narration_sec, cfg)?;
    let out = cfg
        .paths
        .scratch_dir
        .join(artifact_file_name(&req.title, &req.media.audio));
    let argv = render_args(&plan.graph, &req.media.images, &req.media.audio, &out, cfg)?;

    eprintln!(
        "per_image_sec={:.3} transitions={} captions={}",
        plan.timing.per_image_duration(),
        plan.graph.transition_count(),
        plan.graph.caption_count()
    );
    println!("{}", lorereel::to_filter_complex(&plan.graph).replace(';', ";\n"));
    println!();
    println!(
        "{}",
        lorereel::encode::process::describe_command(&cfg.tools.ffmpeg, &argv)
    );
    Ok(())
}

fn cmd_captions(args: CaptionsArgs, cfg: &ComposeConfig) -> anyhow::Result<()> {
    let script = read_script(&args.script)?;
    let phrases = lorereel::extract_captions(&script, &cfg.captions);
    let schedule = lorereel::CaptionSchedule::build(phrases, args.duration)?;
    if schedule.is_empty() {
        eprintln!("no caption-worthy phrases found");
    }
    for caption in schedule.captions() {
        println!(
            "{:>8.3} {:>8.3}  {}",
            caption.window.start, caption.window.end, caption.text
        );
    }
    Ok(())
}
