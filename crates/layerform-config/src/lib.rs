//! Layerform configuration system
//!
//! This crate provides centralized configuration for decomposition and
//! interpolation, loading settings from `layerform.toml` with environment
//! variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name looked up by [`LayerformConfig::load_or_default`].
pub const DEFAULT_CONFIG_FILE: &str = "layerform.toml";

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`LayerformConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LayerformConfig {
    /// Matrix decomposition settings
    pub decompose: DecomposeConfig,
    /// Transform interpolation settings
    pub interpolation: InterpolationConfig,
}

/// Matrix decomposition configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeConfig {
    /// Row norms at or below this value mark the 3x3 block as singular.
    pub epsilon: f64,
}

/// How rotations are blended between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationInterpolation {
    /// Componentwise lerp followed by renormalization (nlerp).
    #[default]
    Linear,
    /// Constant angular velocity along the shorter great arc (slerp).
    Spherical,
}

impl RotationInterpolation {
    /// Parse the lowercase names used in TOML and environment variables.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" | "nlerp" => Some(Self::Linear),
            "spherical" | "slerp" => Some(Self::Spherical),
            _ => None,
        }
    }
}

/// Interpolation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Rotation blending mode
    pub rotation: RotationInterpolation,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self { epsilon: 1e-12 }
    }
}

impl LayerformConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `layerform.toml` in the current directory,
    /// or return the defaults if it is missing or invalid.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                tracing::warn!(error = %err, "using default layerform configuration");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("LAYERFORM_EPSILON") {
            match val.parse::<f64>() {
                Ok(epsilon) if epsilon.is_finite() && epsilon >= 0.0 => {
                    self.decompose.epsilon = epsilon;
                }
                _ => tracing::warn!(value = %val, "ignoring invalid LAYERFORM_EPSILON"),
            }
        }
        if let Ok(val) = std::env::var("LAYERFORM_ROTATION") {
            match RotationInterpolation::from_name(&val) {
                Some(mode) => self.interpolation.rotation = mode,
                None => tracing::warn!(value = %val, "ignoring invalid LAYERFORM_ROTATION"),
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from layerform.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
