//! Unit quaternions for 3D rotation.
//!
//! A quaternion `(w, x, y, z)` with unit norm represents a rotation. `q` and
//! `-q` represent the same rotation, so comparisons that care about the
//! rotation rather than the four-tuple go through
//! [`Quaternion::same_rotation`], and both interpolation modes travel the
//! shorter arc.

use serde::{Deserialize, Serialize};
use std::ops::{Mul, Neg};

use crate::vector::{Vector3, lerp_f64};

/// Below this `1 - |dot|`, slerp falls back to nlerp.
const SLERP_THRESHOLD: f64 = 1e-9;

/// A rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// `axis` is expected to be normalized; it is used as given.
    pub fn from_angle_axis(angle: f64, axis: Vector3) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(cos, axis.x * sin, axis.y * sin, axis.z * sin)
    }

    /// Builds a rotation from an orthonormal, right-handed basis given as the
    /// rows of a row-vector rotation matrix.
    ///
    /// Uses the trace-based conversion, pivoting on the largest of the four
    /// candidate denominators so the division never approaches zero.
    pub fn from_basis(rows: [Vector3; 3]) -> Self {
        let [r0, r1, r2] = rows;
        let (m11, m12, m13) = (r0.x, r0.y, r0.z);
        let (m21, m22, m23) = (r1.x, r1.y, r1.z);
        let (m31, m32, m33) = (r2.x, r2.y, r2.z);

        let pivot = Pivot::select(m11, m22, m33);
        tracing::trace!(?pivot, "quaternion pivot");

        let q = match pivot {
            Pivot::W(candidate) => {
                let s = candidate.sqrt() * 2.0;
                Self::new(0.25 * s, (m23 - m32) / s, (m31 - m13) / s, (m12 - m21) / s)
            }
            Pivot::X(candidate) => {
                let s = candidate.sqrt() * 2.0;
                Self::new((m23 - m32) / s, 0.25 * s, (m12 + m21) / s, (m31 + m13) / s)
            }
            Pivot::Y(candidate) => {
                let s = candidate.sqrt() * 2.0;
                Self::new((m31 - m13) / s, (m12 + m21) / s, 0.25 * s, (m23 + m32) / s)
            }
            Pivot::Z(candidate) => {
                let s = candidate.sqrt() * 2.0;
                Self::new((m12 - m21) / s, (m31 + m13) / s, (m23 + m32) / s, 0.25 * s)
            }
        };
        q.normalize()
    }

    /// Rows of the row-vector rotation matrix for this quaternion.
    ///
    /// A point `p` (as a row) rotates to `p * M`.
    pub fn to_basis(self) -> [Vector3; 3] {
        let Self { w, x, y, z } = self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        [
            Vector3::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz), 2.0 * (xz - wy)),
            Vector3::new(2.0 * (xy - wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx)),
            Vector3::new(2.0 * (xz + wy), 2.0 * (yz - wx), 1.0 - 2.0 * (xx + yy)),
        ]
    }

    pub fn dot(self, other: Self) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy. A zero quaternion normalizes to the identity.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Self::new(self.w / len, self.x / len, self.y / len, self.z / len)
        } else {
            Self::IDENTITY
        }
    }

    /// The inverse rotation for a unit quaternion.
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotation angle in radians, in `[0, 2π]`.
    pub fn angle(self) -> f64 {
        2.0 * self.w.clamp(-1.0, 1.0).acos()
    }

    /// Rotation axis. Returns [`Vector3::X`] for a (near) identity rotation.
    pub fn axis(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
            .try_normalize()
            .unwrap_or(Vector3::X)
    }

    /// Rotates a vector.
    pub fn rotate_vector(self, v: Vector3) -> Vector3 {
        let [r0, r1, r2] = self.to_basis();
        r0 * v.x + r1 * v.y + r2 * v.z
    }

    /// Normalized linear interpolation (nlerp) along the shorter arc.
    ///
    /// `t = 0` returns `self` and `t = 1` returns `to` (sign-flipped if the
    /// endpoints lie in opposite hemispheres) without renormalizing.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        let to = self.shorter_arc_target(to);
        if t == 0.0 {
            return self;
        }
        if t == 1.0 {
            return to;
        }
        Self::new(
            lerp_f64(self.w, to.w, t),
            lerp_f64(self.x, to.x, t),
            lerp_f64(self.y, to.y, t),
            lerp_f64(self.z, to.z, t),
        )
        .normalize()
    }

    /// Spherical linear interpolation along the shorter arc.
    pub fn slerp(self, to: Self, t: f64) -> Self {
        let to = self.shorter_arc_target(to);
        if t == 0.0 {
            return self;
        }
        if t == 1.0 {
            return to;
        }

        let cos_theta = self.dot(to).min(1.0);
        if 1.0 - cos_theta < SLERP_THRESHOLD {
            return self.lerp(to, t);
        }

        let theta = cos_theta.acos();
        let sin_theta = theta.sin();
        let a = ((1.0 - t) * theta).sin() / sin_theta;
        let b = (t * theta).sin() / sin_theta;
        Self::new(
            self.w * a + to.w * b,
            self.x * a + to.x * b,
            self.y * a + to.y * b,
            self.z * a + to.z * b,
        )
    }

    fn shorter_arc_target(self, to: Self) -> Self {
        if self.dot(to) < 0.0 { -to } else { to }
    }

    /// Tuple comparison within `tolerance`.
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        (self.w - other.w).abs() <= tolerance
            && (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }

    /// Whether both quaternions describe the same rotation (`q ≈ q'` or
    /// `q ≈ -q'`).
    pub fn same_rotation(self, other: Self, tolerance: f64) -> bool {
        self.approx_eq(other, tolerance) || self.approx_eq(-other, tolerance)
    }

    pub fn is_finite(self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product: `a * b` rotates by `b` first, then by `a`.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

/// Which quaternion component the matrix conversion solves for first.
///
/// Each variant carries its candidate denominator `4c²` for component `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pivot {
    W(f64),
    X(f64),
    Y(f64),
    Z(f64),
}

impl Pivot {
    fn select(m11: f64, m22: f64, m33: f64) -> Self {
        let candidates = [
            Pivot::W(1.0 + m11 + m22 + m33),
            Pivot::X(1.0 + m11 - m22 - m33),
            Pivot::Y(1.0 - m11 + m22 - m33),
            Pivot::Z(1.0 - m11 - m22 + m33),
        ];
        let mut best = candidates[0];
        for candidate in candidates.into_iter().skip(1) {
            if candidate.value() > best.value() {
                best = candidate;
            }
        }
        best
    }

    fn value(self) -> f64 {
        match self {
            Pivot::W(v) | Pivot::X(v) | Pivot::Y(v) | Pivot::Z(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPSILON: f64 = 1e-12;

    fn axis(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).try_normalize().unwrap()
    }

    #[test]
    fn test_from_angle_axis() {
        let q = Quaternion::from_angle_axis(FRAC_PI_2, Vector3::Z);
        let half = (0.5_f64).sqrt();
        assert!(q.approx_eq(Quaternion::new(half, 0.0, 0.0, half), EPSILON));
        assert!((q.length() - 1.0).abs() < EPSILON);

        // Zero angle with a degenerate axis is still the identity.
        let id = Quaternion::from_angle_axis(0.0, Vector3::ZERO);
        assert_eq!(id, Quaternion::IDENTITY);
    }

    #[test]
    fn test_angle_and_axis() {
        let a = axis(1.0, 1.0, 0.0);
        let q = Quaternion::from_angle_axis(FRAC_PI_4, a);
        assert!((q.angle() - FRAC_PI_4).abs() < 1e-9);
        assert!(q.axis().approx_eq(a, 1e-9));
        assert_eq!(Quaternion::IDENTITY.axis(), Vector3::X);
    }

    #[test]
    fn test_rotate_vector_follows_right_hand_rule() {
        let q = Quaternion::from_angle_axis(FRAC_PI_2, Vector3::Z);
        assert!(q.rotate_vector(Vector3::X).approx_eq(Vector3::Y, EPSILON));
        let q = Quaternion::from_angle_axis(FRAC_PI_2, Vector3::X);
        assert!(q.rotate_vector(Vector3::Y).approx_eq(Vector3::Z, EPSILON));
    }

    #[test]
    fn test_multiplication_composes() {
        let a = Quaternion::from_angle_axis(FRAC_PI_2, Vector3::Z);
        let b = Quaternion::from_angle_axis(FRAC_PI_2, Vector3::X);
        let v = Vector3::new(0.3, -1.2, 2.0);
        let composed = (a * b).rotate_vector(v);
        let sequential = a.rotate_vector(b.rotate_vector(v));
        assert!(composed.approx_eq(sequential, EPSILON));

        let q = Quaternion::from_angle_axis(1.1, axis(1.0, 2.0, 3.0));
        assert!((q * q.conjugate()).approx_eq(Quaternion::IDENTITY, EPSILON));
    }

    #[test]
    fn test_basis_round_trip_every_pivot() {
        let cases = [
            Quaternion::from_angle_axis(0.3, axis(1.0, 2.0, 3.0)),
            Quaternion::from_angle_axis(PI, Vector3::X),
            Quaternion::from_angle_axis(PI, Vector3::Y),
            Quaternion::from_angle_axis(PI, Vector3::Z),
            Quaternion::from_angle_axis(3.0, axis(-1.0, 0.5, 0.25)),
            Quaternion::IDENTITY,
        ];
        for q in cases {
            let back = Quaternion::from_basis(q.to_basis());
            assert!(back.same_rotation(q, 1e-12), "{q:?} -> {back:?}");
        }
    }

    #[test]
    fn test_pivot_selection() {
        assert!(matches!(Pivot::select(1.0, 1.0, 1.0), Pivot::W(_)));
        assert!(matches!(Pivot::select(1.0, -1.0, -1.0), Pivot::X(_)));
        assert!(matches!(Pivot::select(-1.0, 1.0, -1.0), Pivot::Y(_)));
        assert!(matches!(Pivot::select(-1.0, -1.0, 1.0), Pivot::Z(_)));
    }

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_angle_axis(FRAC_PI_4, Vector3::Y);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.slerp(b, 0.0), a);
        assert_eq!(a.slerp(b, 1.0), b);
    }

    #[test]
    fn test_lerp_midpoint_halves_angle() {
        let a = Quaternion::from_angle_axis(0.0, Vector3::ZERO);
        let b = Quaternion::from_angle_axis(FRAC_PI_4, Vector3::Y);
        let expected = Quaternion::from_angle_axis(b.angle() * 0.5, b.axis());
        assert!(a.lerp(b, 0.5).approx_eq(expected, 1e-12));
        assert!(a.slerp(b, 0.5).approx_eq(expected, 1e-12));
    }

    #[test]
    fn test_lerp_is_unit_length() {
        let a = Quaternion::from_angle_axis(0.4, axis(1.0, -2.0, 0.5));
        let b = Quaternion::from_angle_axis(2.9, axis(0.0, 1.0, 1.0));
        for i in -4..=14 {
            let t = i as f64 / 10.0;
            assert!((a.lerp(b, t).length() - 1.0).abs() < EPSILON, "t = {t}");
        }
    }

    #[test]
    fn test_lerp_with_itself() {
        let q = Quaternion::from_angle_axis(1.3, axis(3.0, 1.0, -2.0));
        for t in [0.0, 0.25, 0.5, 0.9, 1.0] {
            assert!(q.lerp(q, t).approx_eq(q, EPSILON));
            assert!(q.slerp(q, t).approx_eq(q, EPSILON));
        }
    }

    #[test]
    fn test_lerp_takes_shorter_arc() {
        let a = Quaternion::from_angle_axis(0.2, Vector3::Z);
        let b = -Quaternion::from_angle_axis(0.6, Vector3::Z);
        assert!(a.dot(b) < 0.0);

        let mid = a.lerp(b, 0.5);
        assert!(mid.same_rotation(Quaternion::from_angle_axis(0.4, Vector3::Z), 1e-12));
        let mid = a.slerp(b, 0.5);
        assert!(mid.same_rotation(Quaternion::from_angle_axis(0.4, Vector3::Z), 1e-12));
        assert_eq!(a.lerp(b, 1.0), -b);
    }

    #[test]
    fn test_slerp_constant_velocity() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_angle_axis(2.0, Vector3::X);
        let quarter = a.slerp(b, 0.25);
        assert!(quarter.approx_eq(Quaternion::from_angle_axis(0.5, Vector3::X), 1e-12));
    }

    #[test]
    fn test_same_rotation() {
        let q = Quaternion::from_angle_axis(PI, Vector3::X);
        assert!(q.same_rotation(-q, EPSILON));
        assert!(!q.approx_eq(-q, EPSILON));
        assert!(!q.same_rotation(Quaternion::IDENTITY, EPSILON));
    }
}
