//! Configuration system
//!
//! Kernel settings live in [`KernelConfig`], which can be loaded from and
//! saved to TOML or RON files through the [`Config`] trait.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::error::KernelError;
use crate::foundation::tolerance::Tolerance;

/// Maximum number of shadow cascades
pub const MAX_CASCADES: usize = 8;

/// Number of cascade distances packed for shaders
pub const PACKED_CASCADES: usize = 4;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// # Cascade Configuration
///
/// Controls how the sun-light shadow camera splits the view frustum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Number of cascades
    pub cascade_count: usize,
    /// Weight of the logarithmic split against the uniform one
    pub split_blend: f32,
    /// Viewer near plane used before a camera is attached
    pub default_near: f32,
    /// Viewer far plane used before a camera is attached
    pub default_far: f32,
    /// Near plane of each light projection
    pub light_near: f32,
    /// Extra distance the light backs away from its split
    pub move_back_margin: f32,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            cascade_count: PACKED_CASCADES,
            split_blend: 0.5,
            default_near: 0.1,
            default_far: 10.0,
            light_near: 0.1,
            move_back_margin: 0.2,
        }
    }
}

impl CascadeConfig {
    /// Set the number of cascades
    pub fn with_cascade_count(mut self, count: usize) -> Self {
        self.cascade_count = count;
        self
    }

    /// Set the logarithmic split weight
    pub fn with_split_blend(mut self, blend: f32) -> Self {
        self.split_blend = blend;
        self
    }

    /// Set the fallback viewer clip range
    pub fn with_default_range(mut self, near: f32, far: f32) -> Self {
        self.default_near = near;
        self.default_far = far;
        self
    }

    /// Set the light projection near plane
    pub fn with_light_near(mut self, near: f32) -> Self {
        self.light_near = near;
        self
    }

    /// Set the light move-back margin
    pub fn with_move_back_margin(mut self, margin: f32) -> Self {
        self.move_back_margin = margin;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cascade_count == 0 {
            return Err("Cascade count must be at least 1".to_string());
        }
        if self.cascade_count > MAX_CASCADES {
            return Err(format!("Cascade count should not exceed {MAX_CASCADES}"));
        }
        if !(0.0..=1.0).contains(&self.split_blend) {
            return Err(format!("Split blend {} must lie in [0, 1]", self.split_blend));
        }
        if self.default_near <= 0.0 || self.default_far <= self.default_near {
            return Err(format!(
                "Default clip range {}..{} must satisfy 0 < near < far",
                self.default_near, self.default_far
            ));
        }
        if self.light_near <= 0.0 {
            return Err("Light near plane must be positive".to_string());
        }
        if self.move_back_margin < 0.0 {
            return Err("Move-back margin cannot be negative".to_string());
        }
        Ok(())
    }
}

/// # Kernel Configuration
///
/// Top-level settings: comparison tolerance and shadow cascades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Float comparison tolerance
    pub tolerance: Tolerance,
    /// Shadow cascade settings
    pub shadow: CascadeConfig,
}

impl KernelConfig {
    /// Set the comparison tolerance
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the cascade settings
    pub fn with_shadow(mut self, shadow: CascadeConfig) -> Self {
        self.shadow = shadow;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.tolerance.validate()?;
        self.shadow.validate()?;
        Ok(())
    }

    /// Load from file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KernelError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(KernelError::InvalidConfig)?;
        log::debug!("loaded kernel config: {config:?}");
        Ok(config)
    }
}

impl Config for KernelConfig {}
