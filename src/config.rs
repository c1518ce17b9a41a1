use std::path::{Path, PathBuf};

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::canvas::{Color, LabelFont};
use crate::error::{Result, WheelError};
use crate::segment::{Prize, Tone};

/// Prize list used when no configuration overrides it.
pub fn default_prizes() -> Vec<Prize> {
    const NUMBERS_AND_TOKENS: [&str; 40] = [
        "400", "350", "500", "600", "750", "550", "350", "500", "1000", "0", "450", "550", "400",
        "500", "500", "x2", "600", "700", "400", "+", "600", "350", "500", "450", "400", "600",
        "350", "500", "ш", "400", "600", "500", "200", "300", "350", "600", "п", "500", "600",
        "x2",
    ];
    NUMBERS_AND_TOKENS
        .iter()
        .map(|raw| match raw.parse::<f64>() {
            Ok(value) => Prize::Number(value),
            Err(_) => Prize::from(*raw),
        })
        .collect()
}

/// Wheel colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub dark: Color,
    pub light: Color,
    pub highlight: Color,
    /// Fill behind the wheel
    pub background: Color,
    pub pointer: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            dark: Color::rgb(0x2f, 0x3a, 0x8f),
            light: Color::rgb(0xf7, 0xf2, 0xea),
            highlight: Color::rgb(0xff, 0xff, 0xff),
            background: Color::rgb(0xf7, 0xf2, 0xea),
            pointer: Color::rgb(0xd6, 0x28, 0x39),
        }
    }
}

impl Palette {
    pub fn wedge(&self, tone: Tone) -> Color {
        match tone {
            Tone::Dark => self.dark,
            Tone::Light => self.light,
        }
    }

    /// Ring band and label colors share the dark/highlight pair.
    pub fn ring(&self, tone: Tone) -> Color {
        match tone {
            Tone::Dark => self.dark,
            Tone::Light => self.highlight,
        }
    }
}

/// Randomized spin parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub min_rotations: f64,
    pub max_rotations: f64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    /// Fixed RNG seed for reproducible spins
    pub seed: Option<u64>,
}

pub const MAX_ROTATIONS: f64 = 1000.0;

impl SpinConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_rotations.is_finite() && self.max_rotations.is_finite()) {
            return Err(WheelError::InvalidConfig(format!(
                "spin rotations {}..{} must be finite",
                self.min_rotations, self.max_rotations
            )));
        }
        if self.max_rotations > MAX_ROTATIONS {
            return Err(WheelError::InvalidConfig(format!(
                "max_rotations {} exceeds {}",
                self.max_rotations, MAX_ROTATIONS
            )));
        }
        if !(self.min_rotations >= 0.0 && self.min_rotations < self.max_rotations) {
            return Err(WheelError::InvalidConfig(format!(
                "spin rotations range {}..{} is empty",
                self.min_rotations, self.max_rotations
            )));
        }
        if self.min_duration_ms == 0 || self.min_duration_ms >= self.max_duration_ms {
            return Err(WheelError::InvalidConfig(format!(
                "spin duration range {}..{} ms is empty",
                self.min_duration_ms, self.max_duration_ms
            )));
        }
        Ok(())
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            min_rotations: 6.0,
            max_rotations: 10.0,
            min_duration_ms: 4800,
            max_duration_ms: 5500,
            seed: None,
        }
    }
}

pub const MIN_FRAMERATE: f64 = 1.0;
pub const MAX_FRAMERATE: f64 = 1000.0;

/// Window and viewport sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Upper bound for the wheel surface side, in pixels.
    pub max_size: u32,
    /// Share of the available viewport the wheel may take.
    pub viewport_scale: f64,
    pub initial_width: u32,
    pub initial_height: u32,
    pub max_framerate: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Fortune Wheel".to_string(),
            max_size: 600,
            viewport_scale: 0.8,
            initial_width: 750,
            initial_height: 750,
            max_framerate: 60.0,
        }
    }
}

const SYSTEM_FONT_CANDIDATES: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Label font selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Explicit font file; system fonts are probed when unset.
    pub path: Option<PathBuf>,
}

impl FontConfig {
    /// Load the configured font, or the first usable system font.
    ///
    /// An explicit path that cannot be loaded is an error. When probing finds
    /// nothing, `Ok(None)` is returned and labels are not drawn.
    pub fn load(&self) -> Result<Option<LabelFont>> {
        if let Some(path) = &self.path {
            let font = read_font(path)?;
            info!("Using label font {}", path.display());
            return Ok(Some(font));
        }
        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match read_font(path) {
                Ok(font) => {
                    info!("Using label font {}", path.display());
                    return Ok(Some(font));
                }
                Err(e) => debug!("Skipping font candidate: {}", e),
            }
        }
        warn!("No usable font found, labels will not be drawn");
        Ok(None)
    }
}

fn read_font(path: &Path) -> Result<LabelFont> {
    let data = std::fs::read(path).map_err(|source| WheelError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    LabelFont::from_bytes(data).ok_or_else(|| WheelError::FontParse(path.to_path_buf()))
}

/// Main configuration struct containing all wheel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct Config {
    #[builder(default = default_prizes())]
    pub prizes: Vec<Prize>,
    #[builder(default)]
    pub palette: Palette,
    #[builder(default)]
    pub spin: SpinConfig,
    #[builder(default)]
    pub window: WindowConfig,
    #[builder(default)]
    pub font: FontConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WheelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.prizes.is_empty() {
            return Err(WheelError::EmptyPrizeList);
        }
        self.spin.validate()?;
        let window = &self.window;
        if window.max_size == 0 {
            return Err(WheelError::InvalidConfig("window max_size must be positive".into()));
        }
        if !(window.viewport_scale.is_finite() && window.viewport_scale > 0.0 && window.viewport_scale <= 1.0) {
            return Err(WheelError::InvalidConfig(format!(
                "viewport_scale {} must be in (0, 1]",
                window.viewport_scale
            )));
        }
        if !(window.max_framerate.is_finite()
            && (MIN_FRAMERATE..=MAX_FRAMERATE).contains(&window.max_framerate))
        {
            return Err(WheelError::InvalidConfig(format!(
                "max_framerate {} must be in {}..={}",
                window.max_framerate, MIN_FRAMERATE, MAX_FRAMERATE
            )));
        }
        Ok(())
    }
}
