//! Scene configuration loaded from TOML.
//!
//! ```toml
//! quality = "high"
//! smooth = true
//!
//! [fog]
//! color = "#a0b0c0"
//!
//! [reflection]
//! water_height = 80
//!
//! [camera]
//! angle = 45
//! x = 1536
//! y = 220
//! z = 1536
//!
//! [assets]
//! heightmap = "assets/heightmap.png"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::RenderError;
use crate::render::color::Rgba;
use crate::render::renderer::{Renderer, checked_water_height};
use crate::render::{Capability, Quality};
use crate::world::camera::CameraUpdate;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub smooth: bool,
    #[serde(default)]
    pub fog: Option<FogConfig>,
    #[serde(default)]
    pub reflection: Option<ReflectionConfig>,
    #[serde(default)]
    pub camera: Option<CameraUpdate>,
    #[serde(default)]
    pub assets: Assets,
}

/// Presence of the table enables fog.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FogConfig {
    pub color: Option<String>,
}

/// Presence of the table enables the reflection map.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ReflectionConfig {
    pub water_height: Option<i32>,
}

/// Image paths; only the viewer reads these.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Assets {
    pub heightmap: Option<PathBuf>,
    pub texturemap: Option<PathBuf>,
    pub sky: Option<PathBuf>,
    pub out_of_bounds_heightmap: Option<PathBuf>,
    pub out_of_bounds_texturemap: Option<PathBuf>,
}

impl SceneConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let cfg = Self::from_toml_str(&s)?;
        log::info!("loaded scene config from {}", path.display());
        Ok(cfg)
    }

    /// Pushes the settings into `renderer`. Fog colour and water height are
    /// checked first; on error the renderer is left as it was.
    pub fn apply(&self, renderer: &mut Renderer) -> Result<(), ConfigError> {
        if let Some(color) = self.fog.as_ref().and_then(|f| f.color.as_deref()) {
            Rgba::from_hex(color)?;
        }
        if let Some(h) = self.reflection.as_ref().and_then(|r| r.water_height) {
            checked_water_height(h)?;
        }

        renderer.set_quality(self.quality);
        if self.smooth {
            renderer.enable(Capability::Smooth);
        } else {
            renderer.disable(Capability::Smooth);
        }

        match &self.fog {
            Some(fog) => {
                renderer.enable(Capability::Fog);
                if let Some(color) = &fog.color {
                    renderer.set_fog_color(color)?;
                }
            }
            None => {
                renderer.disable(Capability::Fog);
            }
        }

        match &self.reflection {
            Some(reflection) => {
                renderer.enable(Capability::ReflectionMap);
                if let Some(h) = reflection.water_height {
                    renderer.set_water_height(h)?;
                }
            }
            None => {
                renderer.disable(Capability::ReflectionMap);
            }
        }

        if let Some(camera) = self.camera {
            renderer.set_camera(camera);
        }
        Ok(())
    }
}
