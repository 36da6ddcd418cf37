use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use digitscope::{
    AppConfig, BitmapSampler, Canvas, DemoSession, FeedbackForm, HttpFeedbackClient,
    HttpPredictionClient, JsonFileStore, KeyValueStore, Label, MemoryStore, Payload,
    PngSequenceSink, PredictionResult, PredictionService, StrokeScript, SubmitOutcome,
    SvgRasterizer, render_preview, render_run,
};

#[derive(Parser, Debug)]
#[command(name = "digitscope", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Configuration JSON (every field optional).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Classifier service base URL, overriding the configuration.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Seed for highlighted-edge sampling, overriding the configuration.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a stroke script and write the 28x28 payload PNG.
    Draw(DrawArgs),
    /// Classify a drawing with the remote service and print the label.
    Predict(PredictArgs),
    /// Render an animation run to a PNG sequence.
    Animate(AnimateArgs),
    /// Send a correction for a previous prediction.
    Feedback(FeedbackArgs),
    /// Draw, predict, cache, animate and optionally send feedback in one go.
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// Stroke script JSON.
    #[arg(long)]
    strokes: PathBuf,

    /// Output payload PNG.
    #[arg(long)]
    out: PathBuf,

    /// Optional upscaled preview PNG at display size.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct DrawingSource {
    /// Stroke script JSON.
    #[arg(long)]
    strokes: Option<PathBuf>,

    /// Existing payload PNG.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[command(flatten)]
    source: DrawingSource,
}

#[derive(Args, Debug)]
struct AnimateArgs {
    /// Predicted class to animate towards; omit to animate without one.
    #[arg(long)]
    label: Option<i64>,

    /// Directory receiving `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct FeedbackArgs {
    /// Payload PNG the prediction was made for.
    #[arg(long)]
    image: PathBuf,

    /// Label the service predicted.
    #[arg(long)]
    prediction: i64,

    /// What the drawing actually is.
    #[arg(long)]
    actual: String,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Stroke script JSON.
    #[arg(long)]
    strokes: PathBuf,

    /// Directory receiving the payload, preview and animation frames.
    #[arg(long)]
    out_dir: PathBuf,

    /// Send this as the actual digit after the animation.
    #[arg(long)]
    actual: Option<String>,

    /// JSON file caching the last drawing and prediction.
    #[arg(long)]
    cache: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.global)?;
    match cli.cmd {
        Command::Draw(args) => cmd_draw(&cfg, args),
        Command::Predict(args) => cmd_predict(&cfg, args).await,
        Command::Animate(args) => cmd_animate(&cfg, args),
        Command::Feedback(args) => cmd_feedback(&cfg, args).await,
        Command::Demo(args) => cmd_demo(&cfg, args).await,
    }
}

fn load_config(global: &GlobalArgs) -> anyhow::Result<AppConfig> {
    let mut cfg = match &global.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };
    if let Some(url) = &global.base_url {
        cfg.endpoint.base_url = url.clone();
    }
    if global.seed.is_some() {
        cfg.animation.seed = global.seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_strokes(path: &Path) -> anyhow::Result<StrokeScript> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read stroke script '{}'", path.display()))?;
    Ok(StrokeScript::from_json_str(&s)?)
}

fn draw(cfg: &AppConfig, strokes: &Path) -> anyhow::Result<BitmapSampler> {
    let mut sampler = BitmapSampler::new(cfg.sampler_opts()?)?;
    read_strokes(strokes)?.replay(&mut sampler);
    Ok(sampler)
}

fn read_payload(path: &Path) -> anyhow::Result<Payload> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(Payload::from_png_bytes(&bytes)?)
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn write_drawing(
    cfg: &AppConfig,
    sampler: &BitmapSampler,
    out: &Path,
    preview: Option<&Path>,
) -> anyhow::Result<Payload> {
    let payload = sampler.export_payload()?;
    write_file(out, &payload.png_bytes()?)?;
    if let Some(preview) = preview {
        let opts = cfg.sampler_opts()?;
        let display = Canvas::new(
            opts.display_width.round() as u32,
            opts.display_height.round() as u32,
        )?;
        let img = render_preview(sampler.surface(), display)?;
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .context("encode preview png")?;
        write_file(preview, &png)?;
    }
    Ok(payload)
}

fn cmd_draw(cfg: &AppConfig, args: DrawArgs) -> anyhow::Result<()> {
    let sampler = draw(cfg, &args.strokes)?;
    write_drawing(cfg, &sampler, &args.out, args.preview.as_deref())?;
    Ok(())
}

async fn cmd_predict(cfg: &AppConfig, args: PredictArgs) -> anyhow::Result<()> {
    let payload = match (&args.source.strokes, &args.source.image) {
        (Some(strokes), _) => draw(cfg, strokes)?.export_payload()?,
        (None, Some(image)) => read_payload(image)?,
        (None, None) => anyhow::bail!("pass --strokes or --image"),
    };
    let client = HttpPredictionClient::new(&cfg.endpoint, cfg.topology()?.class_count())?;
    let prediction = client.predict(&payload).await?;
    println!("{}", prediction.label);
    Ok(())
}

fn cmd_animate(cfg: &AppConfig, args: AnimateArgs) -> anyhow::Result<()> {
    let topology = cfg.topology()?;
    let prediction = args
        .label
        .map(|k| Label::new(k, topology.class_count()).map(PredictionResult::new))
        .transpose()?;
    let mut rng = cfg.random_source();
    let mut sink = PngSequenceSink::new(&args.out_dir);
    let stats = render_run(
        topology,
        prediction,
        &cfg.run_render_opts()?,
        rng.as_mut(),
        &SvgRasterizer::new(),
        &mut sink,
    )?;
    eprintln!(
        "wrote {} frames to {}",
        stats.frames_total,
        args.out_dir.display()
    );
    Ok(())
}

async fn cmd_feedback(cfg: &AppConfig, args: FeedbackArgs) -> anyhow::Result<()> {
    let payload = read_payload(&args.image)?;
    let prediction = Label::new(args.prediction, cfg.topology()?.class_count())?;
    let client = HttpFeedbackClient::new(&cfg.endpoint)?;
    let mut form = FeedbackForm::new();
    form.set_text(args.actual);
    form.submit(&client, &payload, prediction).await?;
    eprintln!("feedback submitted");
    Ok(())
}

async fn cmd_demo(cfg: &AppConfig, args: DemoArgs) -> anyhow::Result<()> {
    match &args.cache {
        Some(path) => run_demo(cfg, &args, JsonFileStore::new(path)).await,
        None => run_demo(cfg, &args, MemoryStore::new()).await,
    }
}

async fn run_demo<S: KeyValueStore>(
    cfg: &AppConfig,
    args: &DemoArgs,
    store: S,
) -> anyhow::Result<()> {
    let topology = cfg.topology()?;
    let predictor = HttpPredictionClient::new(&cfg.endpoint, topology.class_count())?;
    let mut session = DemoSession::new(
        cfg.sampler_opts()?,
        topology,
        cfg.engine_opts(),
        predictor,
        HttpFeedbackClient::new(&cfg.endpoint)?,
        store,
        cfg.random_source(),
    )?;

    if let Some(previous) = session.restore_last() {
        eprintln!("previous prediction: {}", previous.label);
    }
    session.clear_drawing();
    session.replay(&read_strokes(&args.strokes)?);
    write_drawing(
        cfg,
        session.sampler(),
        &args.out_dir.join("drawing.png"),
        Some(&args.out_dir.join("preview.png")),
    )?;

    let label = match session.submit().await? {
        SubmitOutcome::Triggered { label, .. } => label,
        SubmitOutcome::Failed(notice) => anyhow::bail!("{notice}"),
        SubmitOutcome::Stale => anyhow::bail!("prediction response was superseded"),
    };
    println!("{label}");

    let frames_dir = args.out_dir.join("frames");
    let mut sink = PngSequenceSink::new(&frames_dir);
    let stats =
        session.render_current_run(&cfg.run_render_opts()?, &SvgRasterizer::new(), &mut sink)?;
    eprintln!(
        "wrote {} frames to {}",
        stats.frames_total,
        frames_dir.display()
    );
    if !session.engine().is_complete() {
        anyhow::bail!("animation run did not complete");
    }

    if let Some(actual) = &args.actual {
        session.set_feedback_text(actual.clone());
        let sent = session.submit_feedback().await;
        for notice in session.take_notices() {
            eprintln!("{notice}");
        }
        sent?;
    }
    Ok(())
}
