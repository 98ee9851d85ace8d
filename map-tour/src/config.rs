use std::{fmt, fs, path::Path, path::PathBuf, time::Duration};

use egui::Color32;
use logger::Level;
use serde::Deserialize;

use crate::types::{BoundaryFade, BoundaryStyle, CameraState, TransitionOptions};

// Central London.
const START_CAMERA: CameraState = CameraState::new(51.5074, -0.1278, 12.0);
// Hackney, framed.
const END_CAMERA: CameraState = CameraState::new(51.5420, -0.0650, 12.8);

const TRANSITION_DURATION_SECS: f64 = 0.05;
const TRANSITION_EASING: f64 = 0.9;
const TRANSITION_GUARD_MS: u64 = 50;
const PRELOAD_DELAY_MS: u64 = 500;
const RESET_TIMEOUT_MS: u64 = 1000;
const DIALOG_DELAY_MS: u64 = 300;
const FULLSCREEN_DIALOG_DELAY_MS: u64 = 500;

const SNAP_THRESHOLD_START: f64 = 0.10;
const SNAP_THRESHOLD_END: f64 = 0.90;
const PROGRESS_BLOCK_INCREMENT: u32 = 5;
const PROGRESS_BLOCK_COUNT: usize = 20;
const PAGE_SCREENS: f32 = 4.0;

const HACKNEY_Z_INDEX: i32 = 1001;
const WESTMINSTER_Z_INDEX: i32 = 1002;
const BAKERY_Z_INDEX: i32 = 2000;
const MARKER_SCALE_STEP: f32 = 0.1;

const PRELOAD_STEP_MS: u64 = 300;
const PRELOAD_LINGER_MS: u64 = 1000;
// walkers queues at most 20 tile requests; stay well under that per frame.
const PRELOAD_TILES_PER_TICK: usize = 4;

const TILE_CACHE_DIR: &str = ".tile-cache";

// Upper bound for every configured delay and duration.
const MAX_DELAY_MS: u64 = 60_000;

const MAX_MOBILE_WIDTH: f32 = 768.0;

/// Every tunable of the tour. Missing fields in a config file fall back
/// to the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub map: MapConfig,
    pub animation: AnimationConfig,
    pub scroll: ScrollConfig,
    pub boundaries: Vec<BoundaryConfig>,
    pub markers: MarkerConfig,
    pub preload: PreloadConfig,
    pub device: DeviceConfig,
    /// Directory or `http(s)://` URL that boundary URLs are relative to.
    pub asset_base: String,
    pub log_dir: Option<PathBuf>,
    pub log_level: LogLevel,
}

/// Minimum level written by the session logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub start: CameraState,
    pub end: CameraState,
    pub tile_cache: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub transition_duration_secs: f64,
    pub transition_easing: f64,
    /// How long scroll events are dropped after a camera request.
    pub transition_guard_ms: u64,
    pub preload_delay_ms: u64,
    pub reset_timeout_ms: u64,
    pub dialog_delay_ms: u64,
    pub fullscreen_dialog_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub snap_threshold_start: f64,
    pub snap_threshold_end: f64,
    pub progress_block_increment: u32,
    pub progress_block_count: usize,
    /// Page length in viewport heights.
    pub page_screens: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoundaryConfig {
    pub name: String,
    pub url: String,
    pub pane: String,
    pub z_index: i32,
    pub style: BoundaryStyle,
    #[serde(default)]
    pub fade: BoundaryFade,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub pane: String,
    pub z_index: i32,
    pub scale_step: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
    pub points: Vec<CameraState>,
    pub step_ms: u64,
    pub linger_ms: u64,
    /// Tile requests issued per frame while warming.
    pub tiles_per_tick: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub max_mobile_width: f32,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            animation: AnimationConfig::default(),
            scroll: ScrollConfig::default(),
            boundaries: vec![
                BoundaryConfig {
                    name: "Hackney".to_string(),
                    url: "hackney-boundary.json".to_string(),
                    pane: "hackneyPane".to_string(),
                    z_index: HACKNEY_Z_INDEX,
                    style: BoundaryStyle {
                        color: Color32::from_rgb(0x98, 0xD8, 0xC8),
                        fill_color: Color32::from_rgb(0x98, 0xD8, 0xC8),
                        weight: 2.0,
                        opacity: 0.9,
                        fill_opacity: 0.6,
                    },
                    fade: BoundaryFade::default(),
                },
                BoundaryConfig {
                    name: "Westminster".to_string(),
                    url: "westminster-boundary.json".to_string(),
                    pane: "westminsterPane".to_string(),
                    z_index: WESTMINSTER_Z_INDEX,
                    style: BoundaryStyle {
                        color: Color32::from_rgb(0xDC, 0x26, 0x26),
                        fill_color: Color32::from_rgb(0xDC, 0x26, 0x26),
                        weight: 2.0,
                        opacity: 0.9,
                        fill_opacity: 0.3,
                    },
                    fade: BoundaryFade::default(),
                },
            ],
            markers: MarkerConfig::default(),
            preload: PreloadConfig::default(),
            device: DeviceConfig::default(),
            asset_base: "assets".to_string(),
            log_dir: None,
            log_level: LogLevel::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            start: START_CAMERA,
            end: END_CAMERA,
            tile_cache: Some(PathBuf::from(TILE_CACHE_DIR)),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            transition_duration_secs: TRANSITION_DURATION_SECS,
            transition_easing: TRANSITION_EASING,
            transition_guard_ms: TRANSITION_GUARD_MS,
            preload_delay_ms: PRELOAD_DELAY_MS,
            reset_timeout_ms: RESET_TIMEOUT_MS,
            dialog_delay_ms: DIALOG_DELAY_MS,
            fullscreen_dialog_delay_ms: FULLSCREEN_DIALOG_DELAY_MS,
        }
    }
}

impl AnimationConfig {
    /// Camera transition options. A duration that does not fit a
    /// `Duration` makes the camera jump.
    pub fn transition(&self) -> TransitionOptions {
        let secs = self.transition_duration_secs.max(0.0);
        TransitionOptions {
            duration: Duration::try_from_secs_f64(secs).unwrap_or_default(),
            ease_linearity: self.transition_easing,
        }
    }

    pub fn transition_guard(&self) -> Duration {
        Duration::from_millis(self.transition_guard_ms)
    }

    pub fn preload_delay(&self) -> Duration {
        Duration::from_millis(self.preload_delay_ms)
    }

    pub fn reset_timeout(&self) -> Duration {
        Duration::from_millis(self.reset_timeout_ms)
    }

    pub fn dialog_delay(&self) -> Duration {
        Duration::from_millis(self.dialog_delay_ms)
    }

    pub fn fullscreen_dialog_delay(&self) -> Duration {
        Duration::from_millis(self.fullscreen_dialog_delay_ms)
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            snap_threshold_start: SNAP_THRESHOLD_START,
            snap_threshold_end: SNAP_THRESHOLD_END,
            progress_block_increment: PROGRESS_BLOCK_INCREMENT,
            progress_block_count: PROGRESS_BLOCK_COUNT,
            page_screens: PAGE_SCREENS,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            pane: "bakeryPane".to_string(),
            z_index: BAKERY_Z_INDEX,
            scale_step: MARKER_SCALE_STEP,
        }
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            points: vec![
                START_CAMERA,
                CameraState::new(51.5200, -0.1000, 12.3),
                CameraState::new(51.5300, -0.0800, 12.6),
                CameraState::new(51.5375, -0.0650, 12.8),
                END_CAMERA,
            ],
            step_ms: PRELOAD_STEP_MS,
            linger_ms: PRELOAD_LINGER_MS,
            tiles_per_tick: PRELOAD_TILES_PER_TICK,
        }
    }
}

impl PreloadConfig {
    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }

    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            max_mobile_width: MAX_MOBILE_WIDTH,
        }
    }
}

impl TourConfig {
    /// Reads a JSON config file and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: TourConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scroll = &self.scroll;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);

        if !in_unit(scroll.snap_threshold_start) || !in_unit(scroll.snap_threshold_end) {
            return Err(ConfigError::Invalid(
                "snap thresholds must lie in [0, 1]".to_string(),
            ));
        }
        if scroll.snap_threshold_start > scroll.snap_threshold_end {
            return Err(ConfigError::Invalid(format!(
                "snap start {} is above snap end {}",
                scroll.snap_threshold_start, scroll.snap_threshold_end
            )));
        }
        if scroll.progress_block_increment == 0 || scroll.progress_block_increment > 100 {
            return Err(ConfigError::Invalid(
                "progress block increment must be between 1 and 100".to_string(),
            ));
        }
        if scroll.progress_block_count == 0 {
            return Err(ConfigError::Invalid(
                "progress bar needs at least one block".to_string(),
            ));
        }
        if scroll.page_screens.is_nan() || scroll.page_screens <= 0.0 {
            return Err(ConfigError::Invalid(
                "page length must be positive".to_string(),
            ));
        }
        if self.device.max_mobile_width.is_nan() || self.device.max_mobile_width <= 0.0 {
            return Err(ConfigError::Invalid(
                "mobile width must be positive".to_string(),
            ));
        }

        let animation = &self.animation;
        let delays = [
            ("transition guard", animation.transition_guard_ms),
            ("preload delay", animation.preload_delay_ms),
            ("marker reset timeout", animation.reset_timeout_ms),
            ("dialog delay", animation.dialog_delay_ms),
            ("fullscreen dialog delay", animation.fullscreen_dialog_delay_ms),
            ("preload step", self.preload.step_ms),
            ("preload linger", self.preload.linger_ms),
        ];
        if let Some((name, ms)) = delays.iter().find(|(_, ms)| *ms > MAX_DELAY_MS) {
            return Err(ConfigError::Invalid(format!(
                "{} of {} ms is above the {} ms limit",
                name, ms, MAX_DELAY_MS
            )));
        }

        let secs = animation.transition_duration_secs;
        if !secs.is_finite() || secs < 0.0 || secs * 1000.0 > MAX_DELAY_MS as f64 {
            return Err(ConfigError::Invalid(format!(
                "transition duration must be between 0 and {} s",
                MAX_DELAY_MS / 1000
            )));
        }
        if self.preload.tiles_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "preload needs at least one tile request per frame".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Could not read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Malformed config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
