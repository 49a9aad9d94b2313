use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SphereshadeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SphereshadeError::collaborator("x")
            .to_string()
            .contains("renderer error:")
    );
    assert!(SphereshadeError::io("x").to_string().contains("io error:"));
    assert!(
        SphereshadeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SphereshadeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_context_converts_into_other() {
    fn fails() -> SphereshadeResult<()> {
        use anyhow::Context as _;
        Err(std::io::Error::other("disk full")).context("write 'out.png'")?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err, SphereshadeError::Other(_)));
    assert!(err.to_string().contains("write 'out.png'"));
}
