//! Interpolation of transforms and their components.
//!
//! This module provides the `Interpolate` trait and the [`Interpolator`] that
//! blends two transforms through their decompositions instead of lerping the
//! sixteen matrix coefficients, which would collapse volume and flip
//! rotations midway.
//!
//! # Component rules
//!
//! - translation, scale, skew, perspective: componentwise lerp
//! - rotation: nlerp (default) or slerp along the shorter arc

use layerform_config::{LayerformConfig, RotationInterpolation};

use crate::decompose::{DecomposedTransform, Decomposer, recompose};
use crate::error::Result;
use crate::quaternion::Quaternion;
use crate::transform::Transform;
use crate::vector::{Vector3, Vector4, lerp_f64};

/// Trait for types that can be interpolated between two values.
///
/// # Arguments
/// * `to` - Target value to interpolate towards
/// * `t` - Interpolation factor (0.0 = self, 1.0 = to)
///
/// Factors outside `[0, 1]` extrapolate.
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    ///
    /// When t = 0.0, returns self.
    /// When t = 1.0, returns to.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp_f64(*self, *to, t)
    }
}

impl Interpolate for Vector3 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self.lerp(*to, t)
    }
}

impl Interpolate for Vector4 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self.lerp(*to, t)
    }
}

impl Interpolate for Quaternion {
    /// Normalized lerp along the shorter arc.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self.lerp(*to, t)
    }
}

impl Interpolate for DecomposedTransform {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        interpolate_fields(self, to, t, RotationInterpolation::Linear)
    }
}

/// Interpolate any [`Interpolate`] value.
pub fn lerp<T: Interpolate>(from: &T, to: &T, fraction: f64) -> T {
    from.interpolate(to, fraction)
}

/// Interpolate two transforms with the default [`Interpolator`].
pub fn interpolate(from: &Transform, to: &Transform, fraction: f64) -> Result<Transform> {
    Interpolator::default().interpolate(from, to, fraction)
}

fn interpolate_fields(
    from: &DecomposedTransform,
    to: &DecomposedTransform,
    t: f64,
    rotation: RotationInterpolation,
) -> DecomposedTransform {
    DecomposedTransform {
        translation: from.translation.lerp(to.translation, t),
        scale: from.scale.lerp(to.scale, t),
        skew: from.skew.lerp(to.skew, t),
        rotation: match rotation {
            RotationInterpolation::Linear => from.rotation.lerp(to.rotation, t),
            RotationInterpolation::Spherical => from.rotation.slerp(to.rotation, t),
        },
        perspective: from.perspective.lerp(to.perspective, t),
    }
}

/// Blends transforms through decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interpolator {
    decomposer: Decomposer,
    rotation: RotationInterpolation,
}

impl Interpolator {
    pub fn new(decomposer: Decomposer, rotation: RotationInterpolation) -> Self {
        Self {
            decomposer,
            rotation,
        }
    }

    pub fn from_config(config: &LayerformConfig) -> Self {
        Self::new(
            Decomposer::from_config(config),
            config.interpolation.rotation,
        )
    }

    /// Same interpolator with a different rotation mode.
    pub fn with_rotation(mut self, rotation: RotationInterpolation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn rotation(&self) -> RotationInterpolation {
        self.rotation
    }

    pub fn decomposer(&self) -> &Decomposer {
        &self.decomposer
    }

    /// Interpolate between two transforms.
    ///
    /// Both endpoints are decomposed first; if either fails, the error is
    /// returned and no partial result is produced.
    pub fn interpolate(&self, from: &Transform, to: &Transform, t: f64) -> Result<Transform> {
        let from = self.decomposer.decompose(from)?;
        let to = self.decomposer.decompose(to)?;
        Ok(recompose(&self.interpolate_decomposed(&from, &to, t)))
    }

    /// Interpolate two already decomposed transforms field by field.
    pub fn interpolate_decomposed(
        &self,
        from: &DecomposedTransform,
        to: &DecomposedTransform,
        t: f64,
    ) -> DecomposedTransform {
        interpolate_fields(from, to, t, self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecomposeError;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_f64_interpolation() {
        assert_eq!(lerp(&0.0, &100.0, 0.0), 0.0);
        assert_eq!(lerp(&0.0, &100.0, 0.25), 25.0);
        assert_eq!(lerp(&0.0, &100.0, 1.0), 100.0);
        assert_eq!(lerp(&0.0, &100.0, 1.5), 150.0);
        assert_eq!(lerp(&0.0, &100.0, -0.5), -50.0);
    }

    #[test]
    fn test_endpoints_are_exact_through_trait() {
        let a = Vector3::new(0.1, 0.2, 0.3);
        let b = Vector3::new(-7.0, 1e-3, 42.0);
        assert_eq!(lerp(&a, &b, 0.0), a);
        assert_eq!(lerp(&a, &b, 1.0), b);

        let q1 = Quaternion::from_angle_axis(0.3, Vector3::Y);
        let q2 = Quaternion::from_angle_axis(1.7, Vector3::Y);
        assert_eq!(lerp(&q1, &q2, 0.0), q1);
        assert_eq!(lerp(&q1, &q2, 1.0), q2);
    }

    #[test]
    fn test_decomposed_interpolation() {
        let from = DecomposedTransform::identity();
        let to = DecomposedTransform {
            translation: Vector3::new(100.0, 200.0, 0.0),
            scale: Vector3::new(2.0, 3.0, 1.0),
            rotation: Quaternion::from_angle_axis(FRAC_PI_2, Vector3::Z),
            ..DecomposedTransform::identity()
        };

        let mid = from.interpolate(&to, 0.5);
        assert!(mid.translation.approx_eq(Vector3::new(50.0, 100.0, 0.0), EPSILON));
        assert!(mid.scale.approx_eq(Vector3::new(1.5, 2.0, 1.0), EPSILON));
        assert!(
            mid.rotation
                .approx_eq(Quaternion::from_angle_axis(PI / 4.0, Vector3::Z), EPSILON)
        );
    }

    #[test]
    fn test_transform_interpolation_keeps_volume() {
        // Coefficient lerp between +60° and -60° about Z halves the x and y
        // extents; decomposed interpolation rotates through identity.
        let from = Transform::from_angle_axis(PI / 3.0, 0.0, 0.0, 1.0);
        let to = Transform::from_angle_axis(-PI / 3.0, 0.0, 0.0, 1.0);
        let mid = interpolate(&from, &to, 0.5).unwrap();
        assert!(mid.is_identity(EPSILON));

        let naive = (from.m11 + to.m11) * 0.5;
        assert!((naive - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_transform_interpolation_components() {
        let from = Transform::identity().translated(Vector3::new(0.0, 0.0, 0.0));
        let to = Transform::identity()
            .translated(Vector3::new(10.0, 20.0, 30.0))
            .scaled(Vector3::splat(3.0));
        let mid = from.interpolate(&to, 0.5).unwrap();
        let d = mid.decompose().unwrap();
        assert!(d.translation.approx_eq(Vector3::new(5.0, 10.0, 15.0), EPSILON));
        assert!(d.scale.approx_eq(Vector3::splat(2.0), EPSILON));
    }

    #[test]
    fn test_endpoints_reproduce_inputs() {
        let from = Transform::from_angle_axis(0.4, 1.0, 0.0, 1.0).scaled(Vector3::new(1.0, 2.0, 0.5));
        let to = Transform::from_translation(Vector3::new(-1.0, 5.0, 2.0)).skewed_by(0.2, 0.0, 0.1);
        let interpolator = Interpolator::default();
        assert!(interpolator.interpolate(&from, &to, 0.0).unwrap().approx_eq(&from, EPSILON));
        assert!(interpolator.interpolate(&from, &to, 1.0).unwrap().approx_eq(&to, EPSILON));
    }

    #[test]
    fn test_spherical_mode() {
        let from = Transform::identity();
        let to = Transform::from_angle_axis(2.0, 1.0, 0.0, 0.0);
        let slerp = Interpolator::default().with_rotation(RotationInterpolation::Spherical);
        assert_eq!(slerp.rotation(), RotationInterpolation::Spherical);

        let quarter = slerp.interpolate(&from, &to, 0.25).unwrap();
        let expected = Transform::from_angle_axis(0.5, 1.0, 0.0, 0.0);
        assert!(quarter.approx_eq(&expected, EPSILON));

        // nlerp lags constant angular velocity near the endpoints.
        let nlerp = Interpolator::default().interpolate(&from, &to, 0.25).unwrap();
        assert!(!nlerp.approx_eq(&expected, 1e-6));
    }

    #[test]
    fn test_from_config() {
        let mut config = LayerformConfig::default();
        config.interpolation.rotation = RotationInterpolation::Spherical;
        config.decompose.epsilon = 1e-6;
        let interpolator = Interpolator::from_config(&config);
        assert_eq!(interpolator.rotation(), RotationInterpolation::Spherical);
        assert_eq!(interpolator.decomposer().epsilon(), 1e-6);
    }

    #[test]
    fn test_failure_aborts_interpolation() {
        let good = Transform::identity();
        let singular = Transform::from_scale(Vector3::new(1.0, 1.0, 0.0));
        assert!(matches!(
            interpolate(&good, &singular, 0.5),
            Err(DecomposeError::SingularBasis { .. })
        ));
        assert!(interpolate(&singular, &good, 0.5).is_err());
    }
}
