use regex::Regex;

use crate::error::{ConfigError, FilterError};
use crate::filter::ValueFilter;
use crate::model::Value;

/// Accepts values fully matching a regular expression, producing the configured capture group.
///
/// Group `0` is the whole match.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    pattern: String,
    anchored: Regex,
    group: usize,
}

impl RegexFilter {
    /// Create a regex filter that yields the whole match.
    ///
    /// ### Example
    /// ```
    /// # use argwise_engine as argwise;
    /// use argwise::{RegexFilter, Value, ValueFilter};
    ///
    /// let filter = RegexFilter::new("[a-z]+").unwrap();
    /// assert_eq!(filter.parse("abc").unwrap(), Value::Text("abc".to_string()));
    /// // The whole value must match, not a substring.
    /// assert!(filter.parse("abc1").is_err());
    /// ```
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_group(pattern, 0)
    }

    /// Create a regex filter that yields capture `group`.
    pub fn with_group(pattern: impl Into<String>, group: usize) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        let anchored = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| ConfigError::InvalidFilter(format!("bad pattern '{pattern}': {e}")))?;

        if group >= anchored.captures_len() {
            return Err(ConfigError::InvalidFilter(format!(
                "pattern '{pattern}' has no capture group {group}."
            )));
        }

        Ok(Self {
            pattern,
            anchored,
            group,
        })
    }

    /// The pattern, as given.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The capture group returned on a match (0 is the whole match).
    pub fn group(&self) -> usize {
        self.group
    }
}

impl ValueFilter for RegexFilter {
    fn parse(&self, raw: &str) -> Result<Value, FilterError> {
        let captures = self.anchored.captures(raw).ok_or_else(|| {
            FilterError::new(format!(
                "'{raw}' does not match the pattern '{}'.",
                self.pattern
            ))
        })?;

        // A group inside an unmatched alternative yields nothing.
        let value = captures
            .get(self.group)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        Ok(Value::Text(value))
    }

    fn describe(&self) -> String {
        format!("matching '{}'", self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;
    use rstest::rstest;

    #[rstest]
    #[case("[0-9]+", "123", true)]
    #[case("[0-9]+", "12a", false)]
    #[case("[0-9]+", "a12", false)]
    #[case("a|b", "a", true)]
    #[case("a|b", "ab", false)]
    #[case(".*", "", true)]
    fn full_match(#[case] pattern: &str, #[case] raw: &str, #[case] expected_ok: bool) {
        let filter = RegexFilter::new(pattern).unwrap();
        assert_eq!(filter.parse(raw).is_ok(), expected_ok);
    }

    #[test]
    fn capture_group() {
        let filter = RegexFilter::with_group("([a-z]+)=([0-9]+)", 2).unwrap();
        assert_eq!(filter.parse("key=42").unwrap(), Value::Text("42".to_string()));
        assert_eq!(filter.group(), 2);
    }

    #[test]
    fn capture_group_unmatched_alternative() {
        let filter = RegexFilter::with_group("(a)|(b)", 1).unwrap();
        assert_eq!(filter.parse("b").unwrap(), Value::Text(String::default()));
    }

    #[test]
    fn failure_names_pattern() {
        let filter = RegexFilter::new("x+").unwrap();
        assert_contains!(filter.parse("y").unwrap_err().reason(), "'x+'");
    }

    #[rstest]
    #[case("(", 0)]
    #[case("a", 1)]
    #[case("(a)(b)", 3)]
    fn invalid(#[case] pattern: &str, #[case] group: usize) {
        assert_matches!(
            RegexFilter::with_group(pattern, group),
            Err(ConfigError::InvalidFilter(_))
        );
    }
}
