use std::path::{Path, PathBuf};

use bigdecimal::BigDecimal;
use indexmap::{IndexMap, IndexSet};
use num_bigint::BigInt;

use crate::error::ConfigError;

/// The token-prefix convention used to tell flags, options and arguments apart.
///
/// When `flag_marker == option_marker`, flags and options cannot be told apart lexically
/// and the tokenizer falls back to registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment {
    flag_marker: String,
    option_marker: String,
    escape: char,
}

impl Environment {
    /// Create an environment.
    /// Both markers must be non-empty.
    ///
    /// ### Example
    /// ```
    /// # use argwise_engine as argwise;
    /// use argwise::Environment;
    ///
    /// let env = Environment::new("+", "++", '\\').unwrap();
    /// assert!(!env.is_ambiguous());
    /// assert!(Environment::new("", "--", '\\').is_err());
    /// ```
    pub fn new(
        flag_marker: impl Into<String>,
        option_marker: impl Into<String>,
        escape: char,
    ) -> Result<Self, ConfigError> {
        let flag_marker = flag_marker.into();
        let option_marker = option_marker.into();

        if flag_marker.is_empty() || option_marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }

        Ok(Self {
            flag_marker,
            option_marker,
            escape,
        })
    }

    /// `-flag --option value`, escaped with `\`.
    pub fn unix() -> Self {
        Self {
            flag_marker: "-".to_string(),
            option_marker: "--".to_string(),
            escape: '\\',
        }
    }

    /// `/flag /option value`, escaped with `^`.
    pub fn dos() -> Self {
        Self {
            flag_marker: "/".to_string(),
            option_marker: "/".to_string(),
            escape: '^',
        }
    }

    /// The prefix introducing a flag.
    pub fn flag_marker(&self) -> &str {
        &self.flag_marker
    }

    /// The prefix introducing an option.
    pub fn option_marker(&self) -> &str {
        &self.option_marker
    }

    /// The character escaping the next literal character in a line.
    pub fn escape(&self) -> char {
        self.escape
    }

    /// Whether flags and options share the same marker.
    pub fn is_ambiguous(&self) -> bool {
        self.flag_marker == self.option_marker
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::unix()
    }
}

/// A typed value produced by a filter (or passed through raw).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// An arbitrary precision integer.
    BigInteger(BigInt),
    /// A double precision number.
    Decimal(f64),
    /// An arbitrary precision decimal.
    BigDecimal(BigDecimal),
    /// Text, either unfiltered or produced by a filter.
    Text(String),
    /// A filesystem path.
    Path(PathBuf),
    /// The values of a multi-valued option, a variadic argument or an undeclared option.
    List(Vec<Value>),
}

impl Value {
    /// The boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer, if this is an `Integer`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer, if this is a `BigInteger`.
    pub fn as_big_integer(&self) -> Option<&BigInt> {
        match self {
            Value::BigInteger(value) => Some(value),
            _ => None,
        }
    }

    /// The number, if this is a `Decimal`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// The number, if this is a `BigDecimal`.
    pub fn as_big_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::BigDecimal(value) => Some(value),
            _ => None,
        }
    }

    /// The text, if this is a `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The path, if this is a `Path`.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(value) => Some(value),
            _ => None,
        }
    }

    /// The items of a list value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::BigInteger(value) => write!(f, "{value}"),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::BigDecimal(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value}"),
            Value::Path(value) => write!(f, "{}", value.display()),
            Value::List(values) => {
                let items: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// The raw, tokenized input before validation.
///
/// Flag and option names are stored bare (marker stripped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    flags: IndexSet<String>,
    options: IndexMap<String, Vec<String>>,
    // Every (name, value) option occurrence, as given.
    occurrences: Vec<(String, String)>,
    arguments: Vec<String>,
}

impl Input {
    /// The flag names given, deduplicated, in order of appearance.
    pub fn flags(&self) -> &IndexSet<String> {
        &self.flags
    }

    /// The raw values given per option name.
    pub fn options(&self) -> &IndexMap<String, Vec<String>> {
        &self.options
    }

    /// The positional tokens, in order.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// All raw values recorded under the option `name`.
    pub fn option_values(&self, name: &str) -> &[String] {
        self.options.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the flag `name` was given.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub(crate) fn push_flag(&mut self, name: impl Into<String>) {
        self.flags.insert(name.into());
    }

    /// The raw values recorded under any of `names`, in the order they were given.
    pub fn occurrences_of<'i>(&'i self, names: &[String]) -> Vec<&'i str> {
        self.occurrences
            .iter()
            .filter(|(name, _)| names.contains(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub(crate) fn push_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        self.occurrences.push((name.clone(), value.clone()));
        self.options.entry(name).or_default().push(value);
    }

    pub(crate) fn push_argument(&mut self, value: impl Into<String>) {
        self.arguments.push(value.into());
    }
}

/// The validated, typed result of a parse.
///
/// Keyed by each field's primary identifier.
/// Argument values share the option map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedInput {
    flag_values: IndexMap<String, bool>,
    option_values: IndexMap<String, Value>,
}

impl ValidatedInput {
    /// Whether the flag `name` was set.
    /// Undeclared and absent flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flag_values.get(name).copied().unwrap_or(false)
    }

    /// The value of the option/argument `name`, if any.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.option_values.get(name)
    }

    /// Whether `name` is a set flag or a present option/argument value.
    pub fn is_set(&self, name: &str) -> bool {
        self.flag(name) || self.option_values.contains_key(name)
    }

    /// Every flag value, by primary identifier.
    pub fn flag_values(&self) -> &IndexMap<String, bool> {
        &self.flag_values
    }

    /// Every option and argument value, by primary identifier (or bare name for undeclared options).
    pub fn option_values(&self) -> &IndexMap<String, Value> {
        &self.option_values
    }

    pub(crate) fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flag_values.insert(name.into(), value);
    }

    pub(crate) fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.option_values.insert(name.into(), value);
    }

    pub(crate) fn clear_value(&mut self, name: &str) {
        self.option_values.shift_remove(name);
    }

    #[cfg(test)]
    pub(crate) fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.set_flag(name, value);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_value(name, value.into());
        self
    }
}
