//! Optional demo settings, overlaid on defaults from `stardrift.toml`.
//!
//! Only the bins read this; the library never touches the filesystem for
//! configuration.  Unknown theme strings pass through untouched — the
//! sprite resolver's fallback chain absorbs them.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::decor::clamp_density;
use crate::sprites::ThemeConfig;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    /// Device pixel density multiplier.
    pub pixel_density: f32,
    /// Decoration density, clamped to `0..=2` on load.
    pub decor_density: f32,
    pub theme: String,
    /// Per-sprite-key theme overrides.
    pub theme_overrides: HashMap<String, String>,
    pub assets: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: 1280,
            height: 800,
            pixel_density: 1.0,
            decor_density: 1.0,
            theme: "classic".into(),
            theme_overrides: HashMap::new(),
            assets: "assets".into(),
        }
    }
}

impl RenderSettings {
    /// Load and sanitize; a missing file is not an error (defaults apply).
    pub fn load(path: &Path) -> Result<RenderSettings, SettingsError> {
        if !path.exists() {
            return Ok(RenderSettings::default());
        }
        let text = std::fs::read_to_string(path)?;
        let mut settings: RenderSettings = toml::from_str(&text)?;
        settings.decor_density = clamp_density(settings.decor_density);
        settings.pixel_density = settings.pixel_density.clamp(0.5, 4.0);
        Ok(settings)
    }

    pub fn theme_config(&self) -> ThemeConfig {
        ThemeConfig {
            default_variant: self.theme.clone(),
            overrides: self.theme_overrides.clone(),
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
