//! Layerform: interpolation of 3D layer transforms through decomposition.
//!
//! Re-exports the math crate and the configuration crate so applications only
//! depend on `layerform`.
//!
//! ```ignore
//! use layerform::{Transform, Vector3};
//!
//! let from = Transform::identity();
//! let to = Transform::from_angle_axis(1.0, 0.0, 1.0, 0.0).translated(Vector3::new(0.0, 0.0, 50.0));
//! let interpolator = layerform::configured_interpolator();
//! let mid = interpolator.interpolate(&from, &to, 0.5)?;
//! ```

pub use layerform_config as config;
pub use layerform_config::{ConfigError, LayerformConfig};
pub use layerform_math::*;

/// Build an [`Interpolator`] from `layerform.toml` and environment overrides.
pub fn configured_interpolator() -> Interpolator {
    let config = LayerformConfig::load();
    tracing::debug!(
        epsilon = config.decompose.epsilon,
        rotation = ?config.interpolation.rotation,
        "configured interpolator"
    );
    Interpolator::from_config(&config)
}
