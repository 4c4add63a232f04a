//! Decomposed interpolation of 3D layer transforms.
//!
//! This crate provides:
//! - **Vectors and quaternions**: value types with lerp, nlerp and slerp
//! - **Transform**: a row-major 4x4 matrix with left-composing builders
//! - **Decomposition**: translation, scale, skew, rotation and perspective
//! - **Interpolation**: blending transforms component by component
//!
//! # Architecture
//!
//! ```text
//! Transform ──Decomposer──▶ DecomposedTransform
//!                                 │  (x2, fraction)
//!                            Interpolator
//!                                 │
//! Transform ◀──recompose─── DecomposedTransform
//! ```

pub mod decompose;
pub mod error;
pub mod interpolate;
pub mod quaternion;
pub mod transform;
pub mod vector;

pub use decompose::{DecomposedTransform, Decomposer, decompose, recompose};
pub use error::{Axis, DecomposeError, Result};
pub use interpolate::{Interpolate, Interpolator, interpolate, lerp};
pub use quaternion::Quaternion;
pub use transform::Transform;
pub use vector::{Scale, Vector3, Vector4};

pub use layerform_config::RotationInterpolation;
