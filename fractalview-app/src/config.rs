use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use fractalview_core::functions::{self, DEFAULT_FUNCTION};
use fractalview_core::{Color, CoreError, OrbitConvention};
use fractalview_render::{ComputeMode, Direction, RenderError, RenderParameters};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid resolution '{0}' (expected a positive number or \"fullscreen\")")]
    InvalidResolution(String),

    #[error("unknown navigation key '{0}'")]
    UnknownKey(String),

    #[error("unknown action '{0}' (expected list, write or interactive)")]
    UnknownAction(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Image side: a pixel count or the whole (square) surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Pixels(u64),
    Fullscreen,
}

impl Resolution {
    /// Side length on a `width × height` surface.
    pub fn resolve(self, surface: (u32, u32)) -> u64 {
        match self {
            Self::Pixels(side) => side,
            Self::Fullscreen => u64::from(surface.0.min(surface.1)),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(side) => write!(f, "{side}"),
            Self::Fullscreen => f.write_str("fullscreen"),
        }
    }
}

impl std::str::FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "fullscreen" {
            return Ok(Self::Fullscreen);
        }
        match s.parse::<u64>() {
            Ok(side) if side > 0 => Ok(Self::Pixels(side)),
            _ => Err(ConfigError::InvalidResolution(s.to_string())),
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Pixels(side) => serializer.serialize_u64(*side),
            Self::Fullscreen => serializer.serialize_str("fullscreen"),
        }
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(0) => Err(serde::de::Error::custom("resolution must be positive")),
            Raw::Number(side) => Ok(Self::Pixels(side)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Print the registered function names.
    List,
    /// Render one full-resolution image and write it as PNG.
    Write,
    /// Run a scripted navigation session through the progressive engine.
    #[default]
    Interactive,
}

impl std::str::FromStr for Action {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "write" => Ok(Self::Write),
            "interactive" => Ok(Self::Interactive),
            other => Err(ConfigError::UnknownAction(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Session script
// ---------------------------------------------------------------------------

/// Keys held for a number of consecutive frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStep {
    #[serde(default)]
    pub hold: Vec<String>,
    #[serde(default = "default_step_frames")]
    pub frames: u32,
}

impl SessionStep {
    pub fn directions(&self) -> Result<Vec<Direction>, ConfigError> {
        self.hold.iter().map(String::as_str).map(parse_direction).collect()
    }
}

fn parse_direction(key: &str) -> Result<Direction, ConfigError> {
    match key {
        "zoom_in" => Ok(Direction::ZoomIn),
        "zoom_out" => Ok(Direction::ZoomOut),
        "left" => Ok(Direction::PanLeft),
        "right" => Ok(Direction::PanRight),
        "up" => Ok(Direction::PanUp),
        "down" => Ok(Direction::PanDown),
        other => Err(ConfigError::UnknownKey(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Application config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub action: Action,
    #[serde(default = "default_function")]
    pub function: String,
    /// Depth multiplier in interactive sessions; fixed depth for still images.
    #[serde(default = "default_depth")]
    pub depth: u64,
    #[serde(default = "default_color_mask")]
    pub color_mask: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_resolution")]
    pub resolution: Resolution,
    #[serde(default = "default_compute_mode")]
    pub compute_mode: String,
    #[serde(default)]
    pub orbit: OrbitConvention,
    /// Where still images go. Defaults to `images/` next to the executable.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Navigation applied before the session settles.
    #[serde(default = "default_session")]
    pub session: Vec<SessionStep>,
}

fn default_function() -> String {
    DEFAULT_FUNCTION.to_string()
}
fn default_depth() -> u64 {
    RenderParameters::DEFAULT_DEPTH_MULTIPLIER
}
fn default_color_mask() -> String {
    RenderParameters::DEFAULT_COLOR_MASK.to_string()
}
fn default_background_color() -> String {
    RenderParameters::DEFAULT_BACKGROUND.to_string()
}
fn default_resolution() -> Resolution {
    Resolution::Pixels(RenderParameters::DEFAULT_RESOLUTION)
}
fn default_compute_mode() -> String {
    ComputeMode::default().to_string()
}
fn default_step_frames() -> u32 {
    1
}
fn default_session() -> Vec<SessionStep> {
    vec![SessionStep {
        hold: vec!["zoom_in".into()],
        frames: 8,
    }]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            action: Action::default(),
            function: default_function(),
            depth: default_depth(),
            color_mask: default_color_mask(),
            background_color: default_background_color(),
            resolution: default_resolution(),
            compute_mode: default_compute_mode(),
            orbit: OrbitConvention::default(),
            output_dir: None,
            session: default_session(),
        }
    }
}

/// Parameters after names and literals have been checked.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub action: Action,
    pub function_name: String,
    pub depth: u64,
    pub params: RenderParameters,
    pub output_dir: PathBuf,
    pub session: Vec<(Vec<Direction>, u32)>,
}

impl AppConfig {
    /// Load from `path`, falling back to defaults if the file is missing or invalid.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                error!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate every name and literal and build the engine parameters.
    pub fn resolve(&self, surface: (u32, u32)) -> Result<ResolvedConfig, ConfigError> {
        let resolution = self.resolution.resolve(surface);
        let color_mask: Color = self.color_mask.parse()?;
        let background_color: Color = self.background_color.parse()?;
        let compute_mode: ComputeMode = self.compute_mode.parse()?;
        let params = RenderParameters::new(resolution, functions::resolve(&self.function)?)?
            .with_depth_multiplier(self.depth)
            .with_colors(color_mask, background_color)
            .with_orbit(self.orbit)
            .with_compute_mode(compute_mode);
        let session = self
            .session
            .iter()
            .map(|step| Ok((step.directions()?, step.frames)))
            .collect::<Result<_, ConfigError>>()?;

        Ok(ResolvedConfig {
            action: self.action,
            function_name: self.function.clone(),
            depth: self.depth,
            params,
            output_dir: self
                .output_dir
                .clone()
                .unwrap_or_else(crate::app_dir::images_directory),
            session,
        })
    }
}

impl ResolvedConfig {
    /// Multi-line parameter block logged before rendering.
    pub fn report(&self) -> String {
        let p = &self.params;
        format!(
            "Parameters {{\n\
             \t\"complex function\": {},\n\
             \t\"resolution\": {},\n\
             \t\"color mask\": {},\n\
             \t\"background color\": {},\n\
             \t\"depth\": {},\n\
             \t\"orbit\": {},\n\
             \t\"compute mode\": {}\n\
             }}",
            self.function_name,
            p.resolution,
            p.color_mask,
            p.background_color,
            self.depth,
            p.orbit.label(),
            p.compute_mode
        )
    }
}
