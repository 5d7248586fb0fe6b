use crate::error::{ConfigError, FilterError};
use crate::filter::ValueFilter;
use crate::model::Value;

/// Accepts members of a fixed set of strings.
///
/// The configured (canonical) string is always returned, regardless of the input casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFilter {
    values: Vec<String>,
    case_sensitive: bool,
}

impl SetFilter {
    /// Create a set filter.
    /// The set must not be empty.
    ///
    /// ### Example
    /// ```
    /// # use argwise_engine as argwise;
    /// use argwise::{SetFilter, Value, ValueFilter};
    ///
    /// let filter = SetFilter::new(["a", "b"], false).unwrap();
    /// assert_eq!(filter.parse("A").unwrap(), Value::Text("a".to_string()));
    /// ```
    pub fn new<I, S>(values: I, case_sensitive: bool) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();

        if values.is_empty() {
            return Err(ConfigError::InvalidFilter(
                "a set filter requires at least one value.".to_string(),
            ));
        }

        Ok(Self {
            values,
            case_sensitive,
        })
    }

    /// The allowed (canonical) values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether membership is case sensitive.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn matches(&self, candidate: &str, raw: &str) -> bool {
        if self.case_sensitive {
            candidate == raw
        } else {
            candidate.to_lowercase() == raw.to_lowercase()
        }
    }
}

impl ValueFilter for SetFilter {
    fn parse(&self, raw: &str) -> Result<Value, FilterError> {
        self.values
            .iter()
            .find(|candidate| self.matches(candidate, raw))
            .map(|canonical| Value::Text(canonical.clone()))
            .ok_or_else(|| {
                FilterError::new(format!(
                    "'{raw}' is not one of {{{}}}.",
                    self.values.join(", ")
                ))
            })
    }

    fn describe(&self) -> String {
        let casing = if self.case_sensitive {
            ""
        } else {
            " (case insensitive)"
        };
        format!("one of {{{}}}{casing}", self.values.join(", "))
    }
}
