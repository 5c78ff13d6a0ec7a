mod assets;
mod storage;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use escom_shared::models::{CellPosition, PlayerColor, PlayerShape};
use escom_shared::prefs;
use escom_shared::settings::{OptionGroup, SettingsError, SettingsForm};
use escom_shared::svg::SvgCanvas;
use escom_shared::transform::Size;
use escom_shared::viewport::MapViewport;
use tracing_subscriber::EnvFilter;

use assets::FileAssets;
use storage::PreferenceDb;

#[derive(Debug, thiserror::Error)]
enum HostError {
    #[error("preference database error: {0}")]
    Database(#[from] redb::Error),
    #[error("unknown {group} option `{value}`")]
    UnknownOption { group: OptionGroup, value: String },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "escom-host", about = "Headless host for the ESCOM map viewport")]
struct Cli {
    /// Preference database file.
    #[arg(long, env = "ESCOM_PREFS_DB", default_value = "data/preferences.redb")]
    prefs_db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the settings save action.
    Settings(SettingsArgs),
    /// Print the stored player appearance.
    ShowSettings {
        /// Emit JSON instead of `key=value` text.
        #[arg(long)]
        json: bool,
    },
    /// Render the map to SVG.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SettingsArgs {
    /// Rojo, Verde or Azul. Defaults to the stored value.
    #[arg(long)]
    color: Option<String>,
    /// Cuadrado, Triángulo or Círculo. Defaults to the stored value.
    #[arg(long)]
    shape: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Map PNG. Defaults to the image bundled with the web app.
    #[arg(long, env = "ESCOM_MAP_IMAGE", default_value = assets::BUNDLED_MAP_IMAGE)]
    image: PathBuf,

    /// Viewport as WIDTHxHEIGHT, in screen pixels.
    #[arg(long, env = "ESCOM_VIEWPORT", default_value = "1080x1920", value_parser = parse_size)]
    viewport: Size,

    #[arg(long)]
    scale: Option<f64>,

    /// Scroll distance `dx,dy`; repeatable, applied in order after --scale.
    #[arg(long = "drag", value_parser = parse_pair, allow_hyphen_values = true)]
    drags: Vec<(f64, f64)>,

    /// Incremental zoom `factor@x,y`; repeatable, applied after the drags.
    #[arg(long = "pinch", value_parser = parse_pinch)]
    pinches: Vec<(f64, (f64, f64))>,

    /// Local player cell `col,row`.
    #[arg(long, allow_hyphen_values = true)]
    local: Option<CellPosition>,

    /// Remote player cell `col,row`.
    #[arg(long, allow_hyphen_values = true)]
    remote: Option<CellPosition>,

    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Parse a finite number. NaN and infinities are rejected.
fn parse_finite(s: &str, what: &str) -> Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|e| format!("bad {what} `{s}`: {e}"))?;
    if !v.is_finite() {
        return Err(format!("{what} must be finite, got `{s}`"));
    }
    Ok(v)
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let w = parse_finite(w, "width")?;
    let h = parse_finite(h, "height")?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("viewport must be positive, got `{s}`"));
    }
    Ok(Size::new(w, h))
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    Ok((parse_finite(a, "number")?, parse_finite(b, "number")?))
}

fn parse_pinch(s: &str) -> Result<(f64, (f64, f64)), String> {
    let (factor, focus) = s
        .split_once('@')
        .ok_or_else(|| format!("expected `factor@x,y`, got `{s}`"))?;
    Ok((parse_finite(factor, "factor")?, parse_pair(focus)?))
}

fn open_prefs(path: &Path) -> Result<PreferenceDb, HostError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(PreferenceDb::open(path)?)
}

fn run_settings(db: &mut PreferenceDb, args: SettingsArgs) -> Result<SettingsForm, HostError> {
    let mut form = SettingsForm::from_preferences(&*db);
    if let Some(value) = args.color {
        let color = PlayerColor::from_pref(&value).ok_or(HostError::UnknownOption {
            group: OptionGroup::Color,
            value,
        })?;
        form.select_color(color);
    }
    if let Some(value) = args.shape {
        let shape = PlayerShape::from_pref(&value).ok_or(HostError::UnknownOption {
            group: OptionGroup::Shape,
            value,
        })?;
        form.select_shape(shape);
    }
    form.save(db)?;
    Ok(form)
}

fn run_render(db: &PreferenceDb, args: RenderArgs, out: &mut dyn Write) -> Result<(), HostError> {
    let mut view = MapViewport::new(&FileAssets::new(&args.image), db, args.viewport);
    if let Some(scale) = args.scale {
        view.set_scale(scale);
    }
    for (dx, dy) in args.drags {
        view.drag(dx, dy);
    }
    for (factor, focus) in args.pinches {
        view.pinch(factor, focus);
    }
    view.set_local_player_position(args.local);
    view.set_remote_player_position(args.remote);

    let mut canvas = SvgCanvas::new(args.viewport.width, args.viewport.height);
    view.draw(&mut canvas);
    let svg = canvas.finish();

    let (ox, oy) = view.offset();
    tracing::info!(scale = view.scale(), offset_x = ox, offset_y = oy, "Rendered map");

    match args.out {
        Some(path) => std::fs::write(path, svg)?,
        None => writeln!(out, "{svg}")?,
    }
    Ok(())
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<(), HostError> {
    let mut db = open_prefs(&cli.prefs_db)?;
    match cli.command {
        Command::Settings(args) => {
            let form = run_settings(&mut db, args)?;
            if let (Some(color), Some(shape)) = (form.color, form.shape) {
                writeln!(out, "saved color={color} shape={shape}")?;
            }
        }
        Command::ShowSettings { json } => {
            let appearance = prefs::load_appearance(&db);
            if json {
                writeln!(out, "{}", serde_json::to_string(&appearance)?)?;
            } else {
                writeln!(out, "color={} shape={}", appearance.color, appearance.shape)?;
            }
        }
        Command::Render(args) => run_render(&db, args, out)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match run(cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "escom-host failed");
            ExitCode::FAILURE
        }
    }
}
