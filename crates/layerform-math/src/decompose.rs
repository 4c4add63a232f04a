//! Decomposition of a transform into independent components, and the inverse
//! recomposition.
//!
//! A decomposed transform is useful for animation because each component can
//! be interpolated with the rule that fits it: translation, scale, skew and
//! perspective linearly, rotation along the shorter quaternion arc.
//!
//! The factorization is `M = Scale * Skew * Rotation * Translation`, with the
//! perspective column carried alongside.

use serde::{Deserialize, Serialize};

use layerform_config::{DecomposeConfig, LayerformConfig};

use crate::error::{Axis, DecomposeError, Result};
use crate::quaternion::Quaternion;
use crate::transform::Transform;
use crate::vector::{Scale, Vector3, Vector4};

/// Decomposed transform components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedTransform {
    pub translation: Vector3,
    pub scale: Scale,
    /// Skew coefficients: `x` is XY, `y` is XZ, `z` is YZ.
    pub skew: Vector3,
    pub rotation: Quaternion,
    pub perspective: Vector4,
}

impl Default for DecomposedTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl DecomposedTransform {
    /// Create an identity decomposed transform.
    pub fn identity() -> Self {
        Self {
            translation: Vector3::ZERO,
            scale: Vector3::ONE,
            skew: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            perspective: Vector4::PERSPECTIVE_IDENTITY,
        }
    }

    /// Rebuild the matrix. See [`recompose`].
    pub fn recompose(&self) -> Transform {
        recompose(self)
    }

    /// Componentwise comparison within `tolerance`, with rotations compared
    /// up to sign.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.translation.approx_eq(other.translation, tolerance)
            && self.scale.approx_eq(other.scale, tolerance)
            && self.skew.approx_eq(other.skew, tolerance)
            && self.rotation.same_rotation(other.rotation, tolerance)
            && self.perspective.approx_eq(other.perspective, tolerance)
    }
}

/// Factors transforms into [`DecomposedTransform`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposer {
    epsilon: f64,
}

impl Default for Decomposer {
    fn default() -> Self {
        Self::from_decompose_config(&DecomposeConfig::default())
    }
}

impl Decomposer {
    /// Create a decomposer that rejects row norms at or below `epsilon`.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn from_config(config: &LayerformConfig) -> Self {
        Self::from_decompose_config(&config.decompose)
    }

    pub fn from_decompose_config(config: &DecomposeConfig) -> Self {
        Self::new(config.epsilon)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Decompose `transform` into translation, scale, skew, rotation and
    /// perspective.
    ///
    /// Fails when `m44` is zero, when a coefficient is not finite, or when a
    /// row of the 3x3 block collapses below epsilon.
    pub fn decompose(&self, transform: &Transform) -> Result<DecomposedTransform> {
        if !transform.is_finite() {
            tracing::debug!("rejecting decomposition of non-finite transform");
            return Err(DecomposeError::NonFinite);
        }
        if transform.m44 == 0.0 {
            tracing::debug!("rejecting decomposition: m44 is zero");
            return Err(DecomposeError::DegeneratePerspective);
        }

        let mut m = *transform;
        let mut perspective = m.perspective();
        if perspective != Vector4::PERSPECTIVE_IDENTITY {
            tracing::trace!(?perspective, "normalizing by m44");
            m = m.normalized_by_w();
            perspective = m.perspective();
        }

        let translation = Vector3::new(m.m41, m.m42, m.m43);
        let [mut row0, mut row1, mut row2] = m.basis();
        let mut scale = Vector3::ZERO;
        let mut skew = Vector3::ZERO;

        scale.x = self.check_norm(Axis::X, row0.length())?;
        row0 = row0 / scale.x;

        skew.x = row0.dot(row1);
        row1 = row1 - row0 * skew.x;

        scale.y = self.check_norm(Axis::Y, row1.length())?;
        row1 = row1 / scale.y;
        skew.x /= scale.y;

        skew.y = row0.dot(row2);
        row2 = row2 - row0 * skew.y;
        skew.z = row1.dot(row2);
        row2 = row2 - row1 * skew.z;

        scale.z = self.check_norm(Axis::Z, row2.length())?;
        row2 = row2 / scale.z;
        skew.y /= scale.z;
        skew.z /= scale.z;

        // A left-handed basis is a reflection. Fold it into scale.x so the
        // remaining basis is a proper rotation; the skews measured against
        // row0 flip with it.
        if row0.dot(row1.cross(row2)) < 0.0 {
            scale.x = -scale.x;
            row0 = -row0;
            skew.x = -skew.x;
            skew.y = -skew.y;
        }

        let rotation = Quaternion::from_basis([row0, row1, row2]);

        Ok(DecomposedTransform {
            translation,
            scale,
            skew,
            rotation,
            perspective,
        })
    }

    fn check_norm(&self, axis: Axis, norm: f64) -> Result<f64> {
        if norm > self.epsilon {
            Ok(norm)
        } else {
            tracing::debug!(%axis, norm, epsilon = self.epsilon, "singular basis row");
            Err(DecomposeError::SingularBasis { axis, norm })
        }
    }
}

/// Decompose with the default [`Decomposer`].
pub fn decompose(transform: &Transform) -> Result<DecomposedTransform> {
    Decomposer::default().decompose(transform)
}

/// Rebuild a transform from its components.
///
/// Starting from identity, translation, rotation, skew (YZ, XZ, XY) and scale
/// are each composed on the left, giving `Scale * Skew * Rotation *
/// Translation`. The perspective column is then written into `m14, m24, m34,
/// m44` so [`Decomposer::decompose`] reads it back unchanged.
pub fn recompose(decomposed: &DecomposedTransform) -> Transform {
    let DecomposedTransform {
        translation,
        scale,
        skew,
        rotation,
        perspective,
    } = *decomposed;

    let mut m = Transform::identity()
        .translated(translation)
        .rotated(rotation);
    if skew.z != 0.0 {
        m = m.skewed_by(0.0, 0.0, skew.z);
    }
    if skew.y != 0.0 {
        m = m.skewed_by(0.0, skew.y, 0.0);
    }
    if skew.x != 0.0 {
        m = m.skewed_by(skew.x, 0.0, 0.0);
    }
    let mut m = m.scaled(scale);
    m.set_perspective(perspective);
    m
}
