/// Engine limits applied when a pattern is compiled.
///
/// Byte-oriented matching is always on: `.` matches any single byte and
/// classes like `\d` and `\w` are ASCII-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Approximate upper bound, in bytes, on the compiled program.
    pub size_limit: usize,
    /// Upper bound, in bytes, on the lazy DFA cache used while matching.
    pub dfa_size_limit: usize,
    /// Maximum nesting depth of the pattern's syntax tree.
    pub nest_limit: u32,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            size_limit: 10 * (1 << 20),
            dfa_size_limit: 2 * (1 << 20),
            nest_limit: 250,
        }
    }
}
