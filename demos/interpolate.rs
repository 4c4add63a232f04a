//! Prints a transform interpolated through its decomposition at a few
//! fractions, next to the naive coefficient lerp.
//!
//! Run with: cargo run --example interpolate

use anyhow::Result;
use layerform::{Quaternion, Transform, Vector3};

fn print_matrix(label: &str, t: &Transform) {
    println!("{label}:");
    for row in t.to_rows() {
        println!(
            "  [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]",
            row[0], row[1], row[2], row[3]
        );
    }
}

fn naive_lerp(from: &Transform, to: &Transform, t: f64) -> Transform {
    let a = from.to_array();
    let b = to.to_array();
    let mut out = [0.0; 16];
    for i in 0..16 {
        out[i] = a[i] + (b[i] - a[i]) * t;
    }
    Transform::from_array(out)
}

fn main() -> Result<()> {
    let interpolator = layerform::configured_interpolator();

    let from = Transform::identity().translated(Vector3::new(-50.0, 0.0, 0.0));
    let to = Transform::identity()
        .translated(Vector3::new(50.0, 20.0, 0.0))
        .rotated(Quaternion::from_angle_axis(
            std::f64::consts::PI * 0.9,
            Vector3::Z,
        ))
        .scaled(Vector3::new(2.0, 2.0, 1.0));

    for fraction in [0.0, 0.25, 0.5, 0.75, 1.0] {
        println!("=== fraction {fraction} ===");
        let blended = interpolator.interpolate(&from, &to, fraction)?;
        print_matrix("decomposed", &blended);
        print_matrix("naive", &naive_lerp(&from, &to, fraction));

        let d = blended.decompose()?;
        println!(
            "  scale = ({:.3}, {:.3}, {:.3})  angle = {:.3} rad",
            d.scale.x,
            d.scale.y,
            d.scale.z,
            d.rotation.angle()
        );
        println!();
    }

    Ok(())
}
