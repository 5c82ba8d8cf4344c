// Compiled pattern matcher: byte-oriented, buffer-reusing adapter over `regex`
//
// 1. compile() builds the engine program once; matching reuses it
// 2. One capture-slot buffer per compiled pattern, sized to its group count,
//    overwritten by every search and never handed out
// 3. Results are owned copies, so nothing aliases the buffer between calls
// 4. Failed compiles leave the previous program and buffer in place

mod options;

pub use options::MatcherOptions;

use regex::bytes::{CaptureLocations, Regex, RegexBuilder};

use crate::error::{MatcherError, MatcherResult};

/// Captured text of one match: one entry per capturing group, in group order.
/// Groups that did not take part in the match are empty.
pub type Captures = Vec<Vec<u8>>;

/// A pattern compiled together with its reusable capture slots.
struct Compiled {
    source: Vec<u8>,
    text: String,
    regex: Regex,
    slots: CaptureLocations,
    groups: usize,
}

impl Compiled {
    fn build(pattern: &[u8], options: &MatcherOptions) -> MatcherResult<Self> {
        let text = pattern_text(pattern);
        let regex = RegexBuilder::new(&text)
            .unicode(false)
            .size_limit(options.size_limit)
            .dfa_size_limit(options.dfa_size_limit)
            .nest_limit(options.nest_limit)
            .build()
            .map_err(|source| MatcherError::InvalidPattern {
                pattern: String::from_utf8_lossy(pattern).into_owned(),
                source,
            })?;

        // captures_len counts the implicit whole-match group 0
        let groups = regex.captures_len() - 1;
        let slots = regex.capture_locations();

        Ok(Self {
            source: pattern.to_vec(),
            text,
            regex,
            slots,
            groups,
        })
    }

    /// Search `input` from its first byte. On success returns the span of the
    /// whole match; the group slots hold this match until the next search.
    #[inline]
    fn search(&mut self, input: &[u8]) -> Option<(usize, usize)> {
        self.regex
            .captures_read(&mut self.slots, input)
            .map(|m| (m.start(), m.end()))
    }

    /// Copy the current group slots out of the buffer.
    fn snapshot(&self, input: &[u8]) -> Captures {
        (1..=self.groups)
            .map(|i| match self.slots.get(i) {
                Some((start, end)) => input[start..end].to_vec(),
                None => Vec::new(),
            })
            .collect()
    }
}

/// Turn raw pattern bytes into engine syntax. Bytes that are not part of a
/// valid UTF-8 sequence become `\xNN` escapes, which match that exact byte
/// because the pattern is compiled with Unicode mode off.
fn pattern_text(pattern: &[u8]) -> String {
    let mut text = String::with_capacity(pattern.len());
    for chunk in pattern.utf8_chunks() {
        text.push_str(chunk.valid());
        for byte in chunk.invalid() {
            text.push_str(&format!("\\x{:02X}", byte));
        }
    }
    text
}

/// Compiles a pattern once and serves repeated matches against it.
///
/// A matcher starts out either empty or compiled from a pattern. Matching an
/// empty matcher fails with [`MatcherError::NotCompiled`]. Matching takes
/// `&mut self` because the capture buffer is rewritten on each call, so one
/// matcher can never be searched from two places at once.
pub struct PatternMatcher {
    compiled: Option<Compiled>,
    options: MatcherOptions,
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self::with_options(MatcherOptions::default())
    }

    pub fn with_options(options: MatcherOptions) -> Self {
        Self {
            compiled: None,
            options,
        }
    }

    /// Construct and compile in one step.
    pub fn from_pattern(pattern: &str) -> MatcherResult<Self> {
        let mut matcher = Self::new();
        matcher.compile(pattern)?;
        Ok(matcher)
    }

    /// Compile `pattern`, replacing any previously compiled one.
    ///
    /// The replacement only happens once the new pattern has compiled; on
    /// error the matcher is exactly as it was before the call.
    pub fn compile(&mut self, pattern: &str) -> MatcherResult<()> {
        self.compile_bytes(pattern.as_bytes())
    }

    /// Compile a pattern given as raw bytes. Invalid UTF-8 in the pattern
    /// matches the same bytes literally.
    pub fn compile_bytes(&mut self, pattern: &[u8]) -> MatcherResult<()> {
        let compiled = Compiled::build(pattern, &self.options)?;
        tracing::debug!(pattern = %compiled.text, groups = compiled.groups, "compiled pattern");
        self.compiled = Some(compiled);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.compiled.is_some()
    }

    /// Number of capturing groups in the current pattern.
    pub fn group_count(&self) -> Option<usize> {
        self.compiled.as_ref().map(|c| c.groups)
    }

    /// Engine syntax of the current pattern. Identical to the source for
    /// UTF-8 patterns; other bytes appear as `\xNN` escapes.
    pub fn pattern(&self) -> Option<&str> {
        self.compiled.as_ref().map(|c| c.text.as_str())
    }

    /// The current pattern exactly as it was given to compile.
    pub fn source(&self) -> Option<&[u8]> {
        self.compiled.as_ref().map(|c| c.source.as_slice())
    }

    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Find the leftmost match anywhere in `input`.
    ///
    /// Returns `Ok(None)` when the pattern does not occur. A pattern without
    /// capturing groups yields `Ok(Some(vec![]))` on a match.
    pub fn partial_match(&mut self, input: &[u8]) -> MatcherResult<Option<Captures>> {
        let compiled = self.compiled.as_mut().ok_or(MatcherError::NotCompiled)?;
        match compiled.search(input) {
            Some(_) => Ok(Some(compiled.snapshot(input))),
            None => Ok(None),
        }
    }

    /// Collect every non-overlapping match, left to right.
    ///
    /// Matched text is consumed: each search runs over the input that remains
    /// after the previous match, as if it were a fresh string, so `^` and
    /// `\b` can match again at the cursor. An empty match moves the cursor
    /// one byte forward so the scan always terminates.
    /// Returns `Ok(None)` rather than an empty list when nothing matched.
    pub fn find_all(&mut self, input: &[u8]) -> MatcherResult<Option<Vec<Captures>>> {
        let compiled = self.compiled.as_mut().ok_or(MatcherError::NotCompiled)?;

        let mut matches = Vec::new();
        let mut at = 0;
        while at <= input.len() {
            let rest = &input[at..];
            let Some((start, end)) = compiled.search(rest) else {
                break;
            };
            matches.push(compiled.snapshot(rest));
            at += if end == start { end + 1 } else { end };
        }

        tracing::trace!(count = matches.len(), len = input.len(), "scanned input");

        if matches.is_empty() {
            Ok(None)
        } else {
            Ok(Some(matches))
        }
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternMatcher")
            .field("pattern", &self.pattern())
            .field("group_count", &self.group_count())
            .finish()
    }
}
