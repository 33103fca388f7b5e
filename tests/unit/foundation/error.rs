use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ReelError::probe("x").to_string().contains("probe error:"));
    assert!(
        ReelError::infeasible("x")
            .to_string()
            .contains("infeasible timing:")
    );
    assert!(ReelError::graph("x").to_string().contains("graph error:"));
    assert!(ReelError::render("x").to_string().contains("render error:"));
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReelError::config("x").to_string().contains("config error:"));
    assert!(ReelError::cancelled("x").to_string().contains("cancelled:"));
}

#[test]
fn kind_matches_variant() {
    assert_eq!(ReelError::probe("x").kind(), ErrorKind::Probe);
    assert_eq!(ReelError::infeasible("x").kind(), ErrorKind::Infeasible);
    assert_eq!(ReelError::graph("x").kind(), ErrorKind::Graph);
    assert_eq!(ReelError::render("x").kind(), ErrorKind::Render);
    assert_eq!(ReelError::cancelled("x").kind(), ErrorKind::Cancelled);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}
