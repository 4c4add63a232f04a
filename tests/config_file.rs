use anyhow::Result;
use layerform::{ConfigError, Interpolator, LayerformConfig, RotationInterpolation, Transform};
use std::io::Write;

#[test]
fn interpolator_follows_config_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        "[decompose]\nepsilon = 0.01\n\n[interpolation]\nrotation = \"spherical\""
    )?;

    let config = LayerformConfig::load_from_file(file.path())?;
    let interpolator = Interpolator::from_config(&config);
    assert_eq!(interpolator.rotation(), RotationInterpolation::Spherical);
    assert_eq!(interpolator.decomposer().epsilon(), 0.01);

    // A 0.001 scale is rejected under the configured epsilon.
    let tiny = Transform::identity().scaled(layerform::Vector3::new(0.001, 1.0, 1.0));
    assert!(interpolator.interpolate(&Transform::identity(), &tiny, 0.5).is_err());
    assert!(
        Interpolator::default()
            .interpolate(&Transform::identity(), &tiny, 0.5)
            .is_ok()
    );
    Ok(())
}

#[test]
fn malformed_config_reports_parse_error() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[decompose]\nepsilon = \"tiny\"")?;

    match LayerformConfig::load_from_file(file.path()) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other:?}"),
    }
    Ok(())
}
