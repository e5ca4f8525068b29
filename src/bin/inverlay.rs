use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inverlay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the engine and report its version.
    Check(EngineArgs),
    /// Apply the invert-and-overlay effect to a video (requires `ffmpeg` on PATH).
    Process(ProcessArgs),
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Pipeline config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// ffmpeg executable (overrides the config).
    #[arg(long)]
    ffmpeg: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Temporal shift of the inverted overlay, in frames (0-30).
    #[arg(long, default_value_t = inverlay::ShiftFrames::DEFAULT)]
    shift: u32,

    /// Use the fixed one-frame offset instead of `--shift`.
    #[arg(long)]
    legacy_shift: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Process(args) => cmd_process(args),
    }
}

fn load_config(args: &EngineArgs) -> anyhow::Result<inverlay::PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => inverlay::PipelineConfig::from_json_file(path)?,
        None => inverlay::PipelineConfig::default(),
    };
    if let Some(bin) = &args.ffmpeg {
        cfg.ffmpeg_bin = bin.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_check(args: EngineArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let session = inverlay::Session::new(inverlay::FfmpegEngine::new(&cfg), cfg);
    let info = session.initialize()?;
    println!("{}", info.version);
    Ok(())
}

fn cmd_process(args: ProcessArgs) -> anyhow::Result<()> {
    let shift = inverlay::ShiftFrames::new(args.shift)?;
    let mut cfg = load_config(&args.engine)?;
    if args.legacy_shift {
        cfg.shift_mode = inverlay::ShiftMode::Legacy;
    }

    let input = read_input(&args.in_path)?;
    let session = inverlay::Session::new(inverlay::FfmpegEngine::new(&cfg), cfg);

    session.initialize()?;
    session.set_shift(shift.get())?;
    session.select_input(input)?;

    let output = std::thread::scope(|s| {
        let worker = s.spawn(|| session.process());
        while !worker.is_finished() {
            print_status(&session);
            std::thread::sleep(Duration::from_millis(100));
        }
        let result = worker.join();
        print_status(&session);
        result
    })
    .map_err(|_| anyhow::anyhow!("pipeline worker panicked"))??;

    inverlay::ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, &output.bytes)
        .with_context(|| format!("write output '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read input video '{}'", path.display()))
}

fn print_status(session: &inverlay::Session<inverlay::FfmpegEngine>) {
    for event in session.drain_status() {
        eprintln!("{}", event.text());
    }
}
