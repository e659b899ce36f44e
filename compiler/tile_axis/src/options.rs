//! Analysis configuration.

/// Environment variable that overrides [`AnalysisOptions::validate_casts`].
pub const VALIDATE_CASTS_ENV: &str = "TILE_AXIS_VALIDATE_CASTS";

/// Knobs for one analysis instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Check that a value-preserving cast's operand fact has the rank of
    /// the cast's result type before forwarding it. A mismatch gives up on
    /// the cast instead of propagating a fact of the wrong shape.
    pub validate_casts: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            validate_casts: true,
        }
    }
}

impl AnalysisOptions {
    #[must_use]
    pub fn with_validate_casts(mut self, validate_casts: bool) -> Self {
        self.validate_casts = validate_casts;
        self
    }

    /// Defaults, overridden by `TILE_AXIS_VALIDATE_CASTS` when set
    /// (`0`/`false`/`off` disable, anything else enables).
    pub fn from_env() -> Self {
        let options = Self::default();
        match std::env::var(VALIDATE_CASTS_ENV) {
            Ok(raw) => options.with_validate_casts(parse_flag(&raw)),
            Err(_) => options,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}
