// Matcher errors
// Only two failure kinds exist: a pattern the engine rejects, and a match
// attempted before any pattern was compiled.

pub type MatcherResult<T> = Result<T, MatcherError>;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// The engine rejected the pattern text. The matcher keeps whatever it
    /// had compiled before.
    #[error("invalid regexp '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no pattern compiled")]
    NotCompiled,
}

impl MatcherError {
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, MatcherError::InvalidPattern { .. })
    }
}
