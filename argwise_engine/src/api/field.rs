use std::sync::Arc;

use crate::filter::{apply, SharedFilter, ValueFilter};
use crate::model::Value;

/// The names of a flag/option; the first is the primary identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Names(Vec<String>);

impl Names {
    fn new(primary: impl Into<String>) -> Self {
        Self(vec![primary.into()])
    }

    fn push(&mut self, alias: impl Into<String>) {
        let alias = alias.into();

        if !self.0.contains(&alias) {
            self.0.push(alias);
        }
    }

    fn primary(&self) -> &str {
        &self.0[0]
    }

    fn all(&self) -> &[String] {
        &self.0
    }

    fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

/// A default that is kept both raw and filtered.
///
/// Raw defaults are eagerly filtered; when the filter rejects them, the raw text is kept as the default.
#[derive(Debug, Clone, Default)]
struct Initial {
    raw: Option<String>,
    value: Option<Value>,
}

impl Initial {
    fn raw(&mut self, raw: String, filter: Option<&SharedFilter>) {
        self.raw.replace(raw);
        self.refresh(filter);
    }

    fn value(&mut self, value: Value) {
        self.raw = None;
        self.value.replace(value);
    }

    fn refresh(&mut self, filter: Option<&SharedFilter>) {
        if let Some(raw) = &self.raw {
            let value = apply(filter, raw).unwrap_or_else(|_| Value::Text(raw.clone()));
            self.value.replace(value);
        }
    }
}

/// A presence/absence switch.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::CliFlag;
///
/// let flag = CliFlag::new("verbose").alias("v").help("Print more.");
/// assert_eq!(flag.id(), "verbose");
/// assert!(flag.is_named("v"));
/// ```
#[derive(Debug, Clone)]
pub struct CliFlag {
    names: Names,
    description: Option<String>,
}

impl CliFlag {
    /// Create a flag named `name` (its primary identifier).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: Names::new(name),
            description: None,
        }
    }

    /// Add an alternative name.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.names.push(name);
        self
    }

    /// Document the flag (for help output).
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The primary identifier.
    pub fn id(&self) -> &str {
        self.names.primary()
    }

    /// Every name, primary identifier first.
    pub fn names(&self) -> &[String] {
        self.names.all()
    }

    /// Whether `name` is one of this flag's names.
    pub fn is_named(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The help description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A named switch consuming the value that follows it.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::{CliOption, IntegerFilter, Value};
///
/// let option = CliOption::new("count")
///     .filter(IntegerFilter::new().min(1))
///     .default_text("3");
/// assert_eq!(option.initial(), Some(&Value::Integer(3)));
/// ```
#[derive(Debug, Clone)]
pub struct CliOption {
    names: Names,
    filter: Option<SharedFilter>,
    initial: Initial,
    required: bool,
    multiple: bool,
    description: Option<String>,
}

impl CliOption {
    /// Create a single-valued, optional option named `name` (its primary identifier).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: Names::new(name),
            filter: None,
            initial: Initial::default(),
            required: false,
            multiple: false,
            description: None,
        }
    }

    /// Add an alternative name.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.names.push(name);
        self
    }

    /// Convert/validate every value with `filter`.
    pub fn filter(self, filter: impl ValueFilter + 'static) -> Self {
        self.shared_filter(Arc::new(filter))
    }

    /// Convert/validate every value with a filter shared across fields.
    pub fn shared_filter(mut self, filter: SharedFilter) -> Self {
        self.filter.replace(filter);
        self.initial.refresh(self.filter.as_ref());
        self
    }

    /// Use `raw` (run through the filter) when the option is absent.
    /// If the filter rejects `raw`, the raw text itself becomes the default.
    pub fn default_text(mut self, raw: impl Into<String>) -> Self {
        self.initial.raw(raw.into(), self.filter.as_ref());
        self
    }

    /// Use `value` as-is when the option is absent.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.initial.value(value.into());
        self
    }

    /// The option must be given at least once.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The option may be given repeatedly; its values are collected into a list.
    /// Values given under any of its names keep the order they were given in.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Document the option (for help output).
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The primary identifier.
    pub fn id(&self) -> &str {
        self.names.primary()
    }

    /// Every name, primary identifier first.
    pub fn names(&self) -> &[String] {
        self.names.all()
    }

    /// Whether `name` is one of this option's names.
    pub fn is_named(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The filter applied to every raw value, if any.
    pub fn value_filter(&self) -> Option<&SharedFilter> {
        self.filter.as_ref()
    }

    /// The (filtered) default.
    pub fn initial(&self) -> Option<&Value> {
        self.initial.value.as_ref()
    }

    /// Whether the field must be given.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the option may be given more than once.
    pub fn allows_multiple(&self) -> bool {
        self.multiple
    }

    /// The help description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A positional value, matched by its index.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::CliArgument;
///
/// let argument = CliArgument::new("files", 1).variadic().required();
/// assert_eq!(argument.index(), 1);
/// assert!(argument.is_variadic());
/// ```
#[derive(Debug, Clone)]
pub struct CliArgument {
    identifier: String,
    index: usize,
    filter: Option<SharedFilter>,
    initial: Initial,
    required: bool,
    variadic: bool,
    description: Option<String>,
}

impl CliArgument {
    /// Create an optional argument at the positional `index`.
    pub fn new(identifier: impl Into<String>, index: usize) -> Self {
        Self {
            identifier: identifier.into(),
            index,
            filter: None,
            initial: Initial::default(),
            required: false,
            variadic: false,
            description: None,
        }
    }

    /// Convert/validate the value(s) with `filter`.
    pub fn filter(self, filter: impl ValueFilter + 'static) -> Self {
        self.shared_filter(Arc::new(filter))
    }

    /// Convert/validate the value(s) with a filter shared across fields.
    pub fn shared_filter(mut self, filter: SharedFilter) -> Self {
        self.filter.replace(filter);
        self.initial.refresh(self.filter.as_ref());
        self
    }

    /// Use `raw` (run through the filter) when the argument is absent.
    /// If the filter rejects `raw`, the raw text itself becomes the default.
    pub fn default_text(mut self, raw: impl Into<String>) -> Self {
        self.initial.raw(raw.into(), self.filter.as_ref());
        self
    }

    /// Use `value` as-is when the argument is absent.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.initial.value(value.into());
        self
    }

    /// The argument must be given.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Consume every remaining positional token.
    /// Only the argument with the highest index may be variadic.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Document the argument (for help output).
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The primary identifier.
    pub fn id(&self) -> &str {
        &self.identifier
    }

    /// The positional index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The filter applied to the raw value(s), if any.
    pub fn value_filter(&self) -> Option<&SharedFilter> {
        self.filter.as_ref()
    }

    /// The (filtered) default.
    pub fn initial(&self) -> Option<&Value> {
        self.initial.value.as_ref()
    }

    /// Whether the field must be given.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the argument takes every remaining positional token.
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// The help description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
