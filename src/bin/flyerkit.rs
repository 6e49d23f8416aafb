use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flyerkit::{
    AlertSink, AspectRatio, BodyFont, ColorSlot, ContentField, CtaAnimation, DesignEdit,
    DirDownloadSink, EditorConfig, ExportOpts, ExportOutcome, Exporter, FlyerSession, FontEdit,
    HeadlineFont, ImageFetcher, LayoutStyle, OfflineFetcher, PaletteEdit, Rasterizer, Severity,
    StorageClient, SvgRasterizer,
};

#[derive(Parser, Debug)]
#[command(name = "flyerkit", version, about = "Edit and export multi-format flyers")]
struct Cli {
    /// Storage directory (overrides FLYERKIT_STORE_DIR).
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Never touch the network; template backgrounds are skipped.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the template catalog.
    Templates,
    /// Apply a template by name.
    Apply { name: String },
    /// Edit one field of the shared content or design.
    #[command(subcommand)]
    Set(SetCommand),
    /// Use a local image file as the background, or clear it.
    Background {
        #[arg(required_unless_present = "clear")]
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "file")]
        clear: bool,
    },
    /// Switch the active format.
    Format { ratio: AspectRatio },
    /// Print the active format as JSON.
    Show,
    /// Render the active format to a PNG file.
    Export {
        /// Output directory (overrides FLYERKIT_EXPORT_DIR).
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum SetCommand {
    /// e.g. `set content headline "BIG NEWS"`
    Content { field: ContentField, value: String },
    /// e.g. `set color accent "#FF3B30"` or `set color overlayOpacity 0.6`
    Color { slot: String, value: String },
    /// Headline font family.
    HeadlineFont { font: HeadlineFont },
    /// Body font family.
    BodyFont { font: BodyFont },
    Theme { name: String },
    Layout { style: LayoutStyle },
    /// Badge text; omit to remove the badge.
    Badge { text: Option<String> },
    Cta { animation: CtaAnimation },
}

struct StderrAlerts;

impl AlertSink for StderrAlerts {
    fn alert(&self, message: &str) {
        eprintln!("ALERT: {message}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,flyerkit=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = EditorConfig::from_env();
    if let Some(dir) = cli.store_dir.clone() {
        cfg.store_dir = dir;
    }

    if let Command::Templates = cli.cmd {
        for t in flyerkit::catalog() {
            println!(
                "{:<22} {:<24} {}",
                t.name,
                t.flyer_design.layout_style.as_str(),
                t.flyer_design.theme_name
            );
        }
        return Ok(());
    }

    let storage = Arc::new(
        StorageClient::open(&cfg)
            .await
            .with_context(|| format!("open storage in '{}'", cfg.store_dir.display()))?,
    );
    let mut session = FlyerSession::open(Arc::clone(&storage), make_fetcher(cli.offline)?, &cfg).await;

    let result = run(&mut session, &cfg, cli.cmd).await;
    if let Some(notice) = session.notifier().current() {
        let tag = match notice.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        eprintln!("[{tag}] {}", notice.message);
    }
    session.close().await.context("close storage")?;
    result
}

fn make_fetcher(offline: bool) -> anyhow::Result<Arc<dyn ImageFetcher>> {
    if offline {
        return Ok(Arc::new(OfflineFetcher));
    }
    #[cfg(feature = "http")]
    {
        Ok(Arc::new(flyerkit::HttpFetcher::new()?))
    }
    #[cfg(not(feature = "http"))]
    {
        Ok(Arc::new(OfflineFetcher))
    }
}

async fn run(session: &mut FlyerSession, cfg: &EditorConfig, cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Templates => {}
        Command::Apply { name } => {
            let template = flyerkit::find_template(&name)
                .with_context(|| format!("no template named \"{name}\""))?;
            session.apply_template(template).await;
        }
        Command::Set(set) => apply_set(session, set).await?,
        Command::Background { file, clear } => match (file, clear) {
            (_, true) => session.set_background(None).await,
            (Some(path), false) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("read image '{}'", path.display()))?;
                session
                    .upload_background(&bytes, None)
                    .await
                    .with_context(|| format!("use '{}' as background", path.display()))?;
            }
            (None, false) => anyhow::bail!("pass an image file or --clear"),
        },
        Command::Format { ratio } => session.set_active_aspect_ratio(ratio).await,
        Command::Show => {
            let json = serde_json::to_string_pretty(session.active())?;
            println!("{json}");
        }
        Command::Export { out_dir } => {
            let rasterizer: Arc<dyn Rasterizer> = Arc::new(SvgRasterizer::with_system_fonts());
            let dir = out_dir.unwrap_or_else(|| cfg.export_dir.clone());
            let exporter = Exporter::new(
                Some(rasterizer),
                Arc::new(DirDownloadSink::new(dir)),
                Arc::new(StderrAlerts),
                ExportOpts::from_config(cfg),
            );
            let node = session.render_active();
            match exporter.request_export(Some(&node)).await {
                ExportOutcome::Saved(path) => println!("{}", path.display()),
                ExportOutcome::Busy => anyhow::bail!("an export is already running"),
                ExportOutcome::Failed(reason) => anyhow::bail!("export failed: {reason}"),
            }
        }
    }
    Ok(())
}

async fn apply_set(session: &mut FlyerSession, set: SetCommand) -> anyhow::Result<()> {
    match set {
        SetCommand::Content { field, value } => session.set_content(field, value).await,
        SetCommand::Color { slot, value } => {
            let edit = if slot.eq_ignore_ascii_case("overlayOpacity") {
                let v: f64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("overlayOpacity must be a number, got \"{value}\""))?;
                PaletteEdit::OverlayOpacity(v)
            } else {
                PaletteEdit::Color(slot.parse::<ColorSlot>()?, value)
            };
            session.set_color(edit).await?;
        }
        SetCommand::HeadlineFont { font } => session.set_font(FontEdit::Headline(font)).await,
        SetCommand::BodyFont { font } => session.set_font(FontEdit::Body(font)).await,
        SetCommand::Theme { name } => session.set_design(DesignEdit::ThemeName(name)).await,
        SetCommand::Layout { style } => session.set_design(DesignEdit::LayoutStyle(style)).await,
        SetCommand::Badge { text } => {
            let text = text.filter(|t| !t.is_empty());
            session.set_design(DesignEdit::BadgeText(text)).await
        }
        SetCommand::Cta { animation } => {
            session.set_design(DesignEdit::CtaAnimation(animation)).await
        }
    }
    Ok(())
}
