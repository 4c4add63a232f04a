//! 3D affine transform matrices.
//!
//! This module provides a `Transform` struct holding a 4x4 matrix in the
//! row-vector convention used by layer compositors: a point `p` maps to
//! `p * M`, translation lives in the fourth row and the fourth column holds
//! the perspective terms.
//!
//! # Features
//!
//! - **Primitive constructors**: translation, scale, rotation, skew
//! - **Builders**: `translated`, `scaled`, `rotated`, `skewed_by` each compose
//!   a primitive on the left of the existing matrix
//! - **Component access**: read or replace translation, scale and rotation
//!   through decomposition
//!
//! # Usage
//!
//! ```ignore
//! use layerform_math::{Quaternion, Transform, Vector3};
//!
//! let t = Transform::identity()
//!     .translated(Vector3::new(2.0, 4.0, 6.0))
//!     .scaled(Vector3::new(1.0, 2.0, 3.0))
//!     .rotated(Quaternion::from_angle_axis(std::f64::consts::FRAC_PI_4, Vector3::X));
//!
//! let p = t.transform_point(Vector3::ZERO);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Mul;

use crate::decompose::{Decomposer, DecomposedTransform};
use crate::error::Result;
use crate::interpolate::Interpolator;
use crate::quaternion::Quaternion;
use crate::vector::{Vector3, Vector4};

/// A 4x4 transformation matrix, row-major.
///
/// ```text
/// | m11 m12 m13 m14 |   upper-left 3x3: rotation, scale, skew
/// | m21 m22 m23 m24 |   m14, m24, m34:  perspective
/// | m31 m32 m33 m34 |   m41, m42, m43:  translation
/// | m41 m42 m43 m44 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub m11: f64,
    pub m12: f64,
    pub m13: f64,
    pub m14: f64,
    pub m21: f64,
    pub m22: f64,
    pub m23: f64,
    pub m24: f64,
    pub m31: f64,
    pub m32: f64,
    pub m33: f64,
    pub m34: f64,
    pub m41: f64,
    pub m42: f64,
    pub m43: f64,
    pub m44: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform (no change).
    pub const fn identity() -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Create from four rows.
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let [r1, r2, r3, r4] = rows;
        Self {
            m11: r1[0],
            m12: r1[1],
            m13: r1[2],
            m14: r1[3],
            m21: r2[0],
            m22: r2[1],
            m23: r2[2],
            m24: r2[3],
            m31: r3[0],
            m32: r3[1],
            m33: r3[2],
            m34: r3[3],
            m41: r4[0],
            m42: r4[1],
            m43: r4[2],
            m44: r4[3],
        }
    }

    /// Convert to four rows.
    pub const fn to_rows(&self) -> [[f64; 4]; 4] {
        [
            [self.m11, self.m12, self.m13, self.m14],
            [self.m21, self.m22, self.m23, self.m24],
            [self.m31, self.m32, self.m33, self.m34],
            [self.m41, self.m42, self.m43, self.m44],
        ]
    }

    /// Create from 16 coefficients in row-major order.
    pub fn from_array(m: [f64; 16]) -> Self {
        Self::from_rows([
            [m[0], m[1], m[2], m[3]],
            [m[4], m[5], m[6], m[7]],
            [m[8], m[9], m[10], m[11]],
            [m[12], m[13], m[14], m[15]],
        ])
    }

    /// Convert to 16 coefficients in row-major order.
    pub fn to_array(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.to_rows().iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        out
    }

    /// Create a translation transform.
    pub fn from_translation(v: Vector3) -> Self {
        let mut m = Self::identity();
        m.m41 = v.x;
        m.m42 = v.y;
        m.m43 = v.z;
        m
    }

    /// Create a per-axis scale transform.
    pub fn from_scale(s: Vector3) -> Self {
        let mut m = Self::identity();
        m.m11 = s.x;
        m.m22 = s.y;
        m.m33 = s.z;
        m
    }

    /// Create a rotation transform from a unit quaternion.
    pub fn from_rotation(q: Quaternion) -> Self {
        let [r0, r1, r2] = q.to_basis();
        Self::from_basis([r0, r1, r2])
    }

    /// Create a rotation of `angle` radians about the axis `(x, y, z)`.
    ///
    /// The axis does not need to be normalized. A zero axis yields the
    /// identity.
    pub fn from_angle_axis(angle: f64, x: f64, y: f64, z: f64) -> Self {
        match Vector3::new(x, y, z).try_normalize() {
            Some(axis) => Self::from_rotation(Quaternion::from_angle_axis(angle, axis)),
            None => Self::identity(),
        }
    }

    /// Create a skew transform with the given off-diagonal coefficients.
    ///
    /// `xy` lands in `m21`, `xz` in `m31` and `yz` in `m32`.
    pub fn from_skew(xy: f64, xz: f64, yz: f64) -> Self {
        let mut m = Self::identity();
        m.m21 = xy;
        m.m31 = xz;
        m.m32 = yz;
        m
    }

    /// Identity with the upper-left 3x3 replaced by `rows`.
    pub(crate) fn from_basis(rows: [Vector3; 3]) -> Self {
        let [r0, r1, r2] = rows;
        Self::from_rows([
            [r0.x, r0.y, r0.z, 0.0],
            [r1.x, r1.y, r1.z, 0.0],
            [r2.x, r2.y, r2.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rows of the upper-left 3x3 block.
    pub fn basis(&self) -> [Vector3; 3] {
        [
            Vector3::new(self.m11, self.m12, self.m13),
            Vector3::new(self.m21, self.m22, self.m23),
            Vector3::new(self.m31, self.m32, self.m33),
        ]
    }

    /// The perspective column `(m14, m24, m34, m44)`.
    pub fn perspective(&self) -> Vector4 {
        Vector4::new(self.m14, self.m24, self.m34, self.m44)
    }

    /// Overwrite the perspective column.
    pub fn set_perspective(&mut self, p: Vector4) {
        self.m14 = p.x;
        self.m24 = p.y;
        self.m34 = p.z;
        self.m44 = p.w;
    }

    /// Compose a translation on the left: `translate(v) * self`.
    pub fn translated(&self, v: Vector3) -> Self {
        Self::from_translation(v) * *self
    }

    /// Compose a scale on the left: `scale(s) * self`.
    pub fn scaled(&self, s: Vector3) -> Self {
        Self::from_scale(s) * *self
    }

    /// Compose a rotation on the left: `rotation(q) * self`.
    pub fn rotated(&self, q: Quaternion) -> Self {
        Self::from_rotation(q) * *self
    }

    /// Compose a skew on the left: `skew(xy, xz, yz) * self`.
    pub fn skewed_by(&self, xy: f64, xz: f64, yz: f64) -> Self {
        Self::from_skew(xy, xz, yz) * *self
    }

    /// Map a point, including the homogeneous divide.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let x = p.x * self.m11 + p.y * self.m21 + p.z * self.m31 + self.m41;
        let y = p.x * self.m12 + p.y * self.m22 + p.z * self.m32 + self.m42;
        let z = p.x * self.m13 + p.y * self.m23 + p.z * self.m33 + self.m43;
        let w = p.x * self.m14 + p.y * self.m24 + p.z * self.m34 + self.m44;
        if w != 0.0 && w != 1.0 {
            Vector3::new(x / w, y / w, z / w)
        } else {
            Vector3::new(x, y, z)
        }
    }

    /// Every coefficient divided by `m44`.
    pub(crate) fn normalized_by_w(&self) -> Self {
        let w = self.m44;
        let mut rows = self.to_rows();
        for row in rows.iter_mut() {
            for v in row.iter_mut() {
                *v /= w;
            }
        }
        Self::from_rows(rows)
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Check if this is approximately an identity transform.
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Self::identity(), epsilon)
    }

    /// Elementwise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Decompose with the default [`Decomposer`].
    pub fn decompose(&self) -> Result<DecomposedTransform> {
        Decomposer::default().decompose(self)
    }

    /// Interpolate towards `to` with the default [`Interpolator`].
    pub fn interpolate(&self, to: &Self, t: f64) -> Result<Self> {
        Interpolator::default().interpolate(self, to, t)
    }

    /// The translation component.
    ///
    /// Read directly from the fourth row, divided by `m44` when a perspective
    /// term is present.
    pub fn translation(&self) -> Vector3 {
        let t = Vector3::new(self.m41, self.m42, self.m43);
        if self.m44 != 0.0 && self.m44 != 1.0 {
            t / self.m44
        } else {
            t
        }
    }

    /// Replace the translation component, leaving everything else intact.
    pub fn set_translation(&mut self, v: Vector3) {
        let w = if self.m44 != 0.0 { self.m44 } else { 1.0 };
        self.m41 = v.x * w;
        self.m42 = v.y * w;
        self.m43 = v.z * w;
    }

    /// The per-axis scale component.
    pub fn scale(&self) -> Result<Vector3> {
        Ok(self.decompose()?.scale)
    }

    /// Replace the scale component.
    pub fn set_scale(&mut self, s: Vector3) -> Result<()> {
        let mut decomposed = self.decompose()?;
        decomposed.scale = s;
        *self = decomposed.recompose();
        Ok(())
    }

    /// The rotation component.
    pub fn rotation(&self) -> Result<Quaternion> {
        Ok(self.decompose()?.rotation)
    }

    /// Replace the rotation component.
    pub fn set_rotation(&mut self, q: Quaternion) -> Result<()> {
        let mut decomposed = self.decompose()?;
        decomposed.rotation = q;
        *self = decomposed.recompose();
        Ok(())
    }
}

impl Mul for Transform {
    type Output = Self;

    /// Matrix product. In the row-vector convention `a * b` applies `a`
    /// first, then `b`.
    fn mul(self, rhs: Self) -> Self {
        let a = self.to_rows();
        let b = rhs.to_rows();
        let mut out = [[0.0; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| a[i][k] * b[k][j]).sum();
            }
        }
        Self::from_rows(out)
    }
}

impl From<Quaternion> for Transform {
    fn from(q: Quaternion) -> Self {
        Self::from_rotation(q)
    }
}

impl From<[[f64; 4]; 4]> for Transform {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Transform> for [[f64; 4]; 4] {
    fn from(t: Transform) -> Self {
        t.to_rows()
    }
}
