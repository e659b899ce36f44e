//! Environment overrides for `AnalysisOptions`.
//!
//! Kept in its own test binary: it mutates the process environment, and
//! nothing else in this binary reads it.

use tile_axis::{AnalysisOptions, VALIDATE_CASTS_ENV};

#[test]
fn environment_overrides_default() {
    std::env::remove_var(VALIDATE_CASTS_ENV);
    assert!(AnalysisOptions::from_env().validate_casts);

    std::env::set_var(VALIDATE_CASTS_ENV, "off");
    assert!(!AnalysisOptions::from_env().validate_casts);

    std::env::set_var(VALIDATE_CASTS_ENV, "1");
    assert!(AnalysisOptions::from_env().validate_casts);

    std::env::remove_var(VALIDATE_CASTS_ENV);
}
