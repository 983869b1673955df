//! Format (regular expression) generator.
//!
//! Matching values come from proptest's regex strategy, seeded from the run's
//! random source. Non-matching values come from random strings first, then
//! from a negated form of the expression.

use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::{Config, RngAlgorithm, TestRng, TestRunner};
use regex::Regex;
use tracing::debug;

use crate::error::GeneratorError;
use crate::random::{RandomSource, RandomString};

pub const DEFAULT_INVALID_TRIES: usize = 5;
pub const DEFAULT_MIN_RANDOM_LENGTH: usize = 0;
pub const DEFAULT_MAX_RANDOM_LENGTH: usize = 500;

#[derive(Debug, Clone)]
pub struct RegexGenerator {
    pattern: String,
    matcher: Regex,
    chars: RandomString,
    min_random_length: usize,
    max_random_length: usize,
    invalid_tries: usize,
}

impl RegexGenerator {
    /// Compile `pattern`; a pattern that does not parse is a configuration error.
    pub fn new(pattern: &str) -> Result<Self, GeneratorError> {
        let matcher = Regex::new(&format!("^(?:{})$", strip_anchors(pattern)))?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
            chars: RandomString,
            min_random_length: DEFAULT_MIN_RANDOM_LENGTH,
            max_random_length: DEFAULT_MAX_RANDOM_LENGTH,
            invalid_tries: DEFAULT_INVALID_TRIES,
        })
    }

    /// Length bounds of the random strings tried by [`Self::invalid`].
    #[must_use]
    pub fn with_random_lengths(mut self, min: usize, max: usize) -> Self {
        self.min_random_length = min.min(max);
        self.max_random_length = max.max(min);
        self
    }

    #[must_use]
    pub fn with_invalid_tries(mut self, tries: usize) -> Self {
        self.invalid_tries = tries;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the whole of `value` matches the expression.
    pub fn matches(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }

    /// A string matching the expression, or `None` when the expression uses
    /// constructs values cannot be generated from.
    pub fn valid(&self, rng: &mut RandomSource) -> Option<String> {
        sample(strip_anchors(&self.pattern), rng).filter(|s| self.matches(s))
    }

    /// A string that does not match the expression.
    pub fn invalid(&self, rng: &mut RandomSource) -> Option<String> {
        for _ in 0..self.invalid_tries {
            let candidate = self
                .chars
                .between(rng, self.min_random_length, self.max_random_length);
            if !self.matches(&candidate) {
                return Some(candidate);
            }
        }
        let negated = negate_expression(&self.pattern);
        debug!(pattern = %self.pattern, %negated, "random strings matched, trying negated expression");
        sample(&negated, rng).filter(|s| !self.matches(s))
    }
}

/// Drop a leading `^` and an unescaped trailing `$`.
pub fn strip_anchors(pattern: &str) -> &str {
    let body = pattern.strip_prefix('^').unwrap_or(pattern);
    match body.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => body,
    }
}

/// Heuristic negation of an expression.
///
/// A leading character class is complemented (`[a-z]+` -> `[^a-z]+`, and
/// `[^0-9]` -> `[0-9]`); anything else becomes one character outside the
/// expression's literal characters (`abc` -> `[^abc]`).
pub fn negate_expression(pattern: &str) -> String {
    let body = strip_anchors(pattern);
    if let Some(rest) = body.strip_prefix("[^") {
        format!("[{rest}")
    } else if let Some(rest) = body.strip_prefix('[') {
        format!("[^{rest}")
    } else {
        format!("[^{body}]")
    }
}

fn sample(pattern: &str, rng: &mut RandomSource) -> Option<String> {
    let strategy = proptest::string::string_regex(pattern).ok()?;
    let seeded = TestRng::from_seed(RngAlgorithm::ChaCha, &rng.seed_bytes());
    let mut runner = TestRunner::new_with_rng(Config::default(), seeded);
    strategy.new_tree(&mut runner).ok().map(|tree| tree.current())
}
