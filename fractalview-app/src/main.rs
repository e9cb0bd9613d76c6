mod app_dir;
mod config;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use tracing::{error, info};

use fractalview_core::functions::{self, DEFAULT_FUNCTION};
use fractalview_render::{export, render_still, ExportMetadata, FrameBuffer};

use config::{Action, AppConfig, ConfigError, ResolvedConfig};

/// Surface the headless host pretends to have, for `"fullscreen"`.
const HEADLESS_SURFACE: (u32, u32) = (1920, 1080);

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] fractalview_render::RenderError),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn list_functions() {
    let names: Vec<&str> = functions::names().collect();
    println!("Functions: {}", names.join(", "));
    println!("Default: {DEFAULT_FUNCTION}");
}

fn write_image(config: &ResolvedConfig) -> Result<PathBuf, AppError> {
    let params = &config.params;
    let side = u32::try_from(params.resolution)
        .map_err(|_| fractalview_render::RenderError::InvalidResolution(params.resolution))?;

    info!("Write mode. Started, please wait");
    let start = Instant::now();
    let mut frame = FrameBuffer::new(side, side, params.background_color);
    render_still(params, config.depth, &mut frame.as_pixel_buffer())?;

    std::fs::create_dir_all(&config.output_dir).map_err(|source| AppError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;
    let metadata = ExportMetadata {
        function: config.function_name.clone(),
        depth: config.depth,
        color_mask: params.color_mask,
        background_color: params.background_color,
        compute_mode: params.compute_mode,
        resolution: params.resolution,
    };
    let path = export::next_free_path(&config.output_dir, &metadata);
    export::export_png(&path, &frame, &metadata)?;
    info!(
        path = %path.display(),
        elapsed_ms = start.elapsed().as_millis(),
        "Finished"
    );
    Ok(path)
}

fn run(config: &AppConfig) -> Result<(), AppError> {
    if config.action == Action::List {
        list_functions();
        return Ok(());
    }

    let resolved = config.resolve(HEADLESS_SURFACE)?;
    info!("{}", resolved.report());
    match resolved.action {
        Action::List => list_functions(),
        Action::Write => {
            write_image(&resolved)?;
        }
        Action::Interactive => {
            session::run_session(resolved.params, &resolved.session)?;
        }
    }
    Ok(())
}

/// `fractalview [config.json] [list|write|interactive]`
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting FractalView");

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(app_dir::default_config_path);
    let mut config = AppConfig::load(&config_path);

    if let Some(action) = args.next() {
        match action.parse() {
            Ok(action) => config.action = action,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
