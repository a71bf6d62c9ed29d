use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollphase::headless::{HeadlessPage, ScriptStep};
use scrollphase::{Rect, SequenceConfig, SequenceHost};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrollphase", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a preset sequence config as JSON.
    Preset(PresetArgs),
    /// Mount a config on a headless page and replay a script of input events.
    Replay(ReplayArgs),
    /// Compile a config and report the first error.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct PresetArgs {
    /// Preset name: envelope, expand-hero, capsule, showcase or crossfade-hero.
    name: String,

    /// Use the small-screen variant.
    #[arg(long)]
    mobile: bool,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Sequence config JSON.
    #[arg(long)]
    config: PathBuf,

    /// JSON array of script steps.
    #[arg(long)]
    script: PathBuf,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Document offset of the sequence container's top edge.
    #[arg(long, default_value_t = 0.0)]
    container_top: f64,

    /// Container height; defaults to the viewport height.
    #[arg(long)]
    container_height: Option<f64>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Sequence config JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preset(args) => cmd_preset(args),
        Command::Replay(args) => cmd_replay(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))
}

fn cmd_preset(args: PresetArgs) -> anyhow::Result<()> {
    let config = scrollphase::presets::by_name(&args.name, args.mobile)
        .with_context(|| {
            format!(
                "unknown preset '{}' (expected one of: {})",
                args.name,
                scrollphase::presets::NAMES.join(", ")
            )
        })?;
    println!("{}", config.to_json_pretty()?);
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let config: SequenceConfig = read_json(&args.config, "config")?;
    let steps: Vec<ScriptStep> = read_json(&args.script, "script")?;

    let container_height = args.container_height.unwrap_or(args.height);
    let page = HeadlessPage::new(
        args.width,
        args.height,
        Rect::new(
            0.0,
            args.container_top,
            args.width,
            args.container_top + container_height,
        ),
    );
    let mut host = SequenceHost::mount(config, page.ports());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for state in page.replay(&mut host, &steps) {
        serde_json::to_writer(&mut out, &state).context("write visual state")?;
        writeln!(out)?;
    }
    out.flush()?;

    eprintln!(
        "replayed {} steps; status {:?}, pin {:?}",
        steps.len(),
        host.status(),
        host.pin_state()
    );
    host.unmount();
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let config: SequenceConfig = read_json(&args.config, "config")?;
    let timeline = config
        .compile()
        .with_context(|| format!("compile '{}'", config.name))?;

    eprintln!(
        "ok: '{}' has {} phases over {} keyframes",
        timeline.name(),
        timeline.segment_count(),
        timeline.keyframes().len()
    );
    Ok(())
}
