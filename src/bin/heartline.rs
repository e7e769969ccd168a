use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "heartline", version)]
struct Cli {
    /// Log engine activity (reveals, bursts, timers) to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the particle overlay after N display frames as a PNG.
    Frame(FrameArgs),
    /// Render a numbered PNG sequence of the particle overlay.
    Frames(FramesArgs),
    /// Run an event script and write the session trace as JSON.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Page configuration JSON (defaults to the stock page).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Scroll to the surprise and click its heart just before this frame.
    #[arg(long)]
    burst_at: Option<u64>,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Page configuration JSON (defaults to the stock page).
    #[arg(long)]
    config: Option<PathBuf>,

    /// First frame to write.
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Number of frames in the written range.
    #[arg(long)]
    count: u64,

    /// Write every K-th frame of the range.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Scroll to the surprise and click its heart just before this frame.
    #[arg(long)]
    burst_at: Option<u64>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Page configuration JSON (defaults to the stock page).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of page events.
    #[arg(long)]
    script: PathBuf,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<heartline::PageConfig> {
    let config = match path {
        Some(p) => heartline::PageConfig::from_path(p)
            .with_context(|| format!("load page config '{}'", p.display()))?,
        None => heartline::PageConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Advance one display frame, clicking the surprise heart first when asked.
fn step(
    session: &mut heartline::PageSession,
    frame: u64,
    burst_at: Option<u64>,
) -> anyhow::Result<()> {
    if burst_at == Some(frame) {
        session.dispatch(heartline::PageEvent::ScrollToSection {
            section: heartline::SectionKind::Surprise,
        })?;
        session.dispatch(heartline::PageEvent::ClickHeart)?;
    }
    session.dispatch(heartline::PageEvent::Frame)?;
    Ok(())
}

fn render_last(
    session: &heartline::PageSession,
    renderer: &mut heartline::CpuRenderer,
) -> anyhow::Result<heartline::FrameRGBA> {
    let snapshot = session
        .last_frame()
        .context("no frame was drawn (viewport has zero area)")?;
    let frame = heartline::render_frame(renderer, snapshot, &session.config().render)?
        .context("no drawable surface for the last frame")?;
    Ok(frame)
}

fn write_png(path: &Path, frame: &heartline::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut session = heartline::PageSession::new(config)?;
    for f in 0..=args.frame {
        step(&mut session, f, args.burst_at)?;
    }

    let mut renderer = heartline::CpuRenderer::new();
    let frame = render_last(&session, &mut renderer)?;
    write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.every > 0, "--every must be > 0");
    let range = heartline::FrameRange::new(
        heartline::FrameIndex(args.start),
        heartline::FrameIndex(args.start.saturating_add(args.count)),
    )?;

    let config = load_config(args.config.as_deref())?;
    let mut session = heartline::PageSession::new(config)?;
    let mut renderer = heartline::CpuRenderer::new();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut written = 0u64;
    for f in 0..range.end.0 {
        step(&mut session, f, args.burst_at)?;
        let idx = heartline::FrameIndex(f);
        if !range.contains(idx) || (f - range.start.0) % args.every != 0 {
            continue;
        }
        let frame = render_last(&session, &mut renderer)?;
        write_png(&args.out_dir.join(format!("frame_{f:05}.png")), &frame)?;
        written += 1;
    }

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

#[derive(serde::Serialize)]
struct SimulationReport<'a> {
    trace: &'a heartline::SessionTrace,
    snapshot: heartline::PageSnapshot,
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("read script '{}'", args.script.display()))?;
    let events: Vec<heartline::PageEvent> =
        serde_json::from_str(&text).with_context(|| "parse event script JSON")?;

    let mut session = heartline::PageSession::new(config)?;
    for (i, event) in events.into_iter().enumerate() {
        session
            .dispatch(event)
            .with_context(|| format!("event #{i}"))?;
    }

    let report = SimulationReport {
        trace: session.trace(),
        snapshot: session.snapshot(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("write trace '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
