use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PodiumError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PodiumError::dataset("x")
            .to_string()
            .contains("dataset error:")
    );
    assert!(
        PodiumError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(PodiumError::render("x").to_string().contains("render error:"));
    assert!(
        PodiumError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PodiumError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: PodiumError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, PodiumError::Serde(_)));
}
