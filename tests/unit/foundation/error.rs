use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SeqError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SeqError::render("x").to_string().contains("render error:"));
    assert!(
        SeqError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SeqError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: SeqError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, SeqError::Serde(_)));
}
