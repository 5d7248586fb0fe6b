mod builtin;

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::api::{CliArgument, CliFlag, CliOption, Declaration};
use crate::error::ConfigError;
use crate::filter::SharedFilter;
use crate::rule::SharedRule;
use crate::validator::Validator;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Builds a filter from its configuration node.
pub type FilterFactory = Arc<dyn Fn(&Node) -> Result<SharedFilter, ConfigError> + Send + Sync>;

/// Builds a rule from its configuration node.
/// Composite rules build their children through the given [`Factories`].
pub type RuleFactory =
    Arc<dyn Fn(&Factories, &Node) -> Result<SharedRule, ConfigError> + Send + Sync>;

/// A declarative configuration element: a type name, string attributes, referenced field names and child elements.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::Node;
///
/// let node = Node::new("integer").attribute("min", "1").attribute("max", "5");
/// assert_eq!(node.text("min"), Some("1"));
/// assert_eq!(node.parse::<i64>("max").unwrap(), Some(5));
/// assert!(node.parse::<i64>("radix").unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    kind: String,
    attributes: IndexMap<String, String>,
    fields: Vec<String>,
    children: Vec<Node>,
}

impl Node {
    /// A node of type `kind`, without attributes, fields or children.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set the attribute `name`.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Reference a declared field by name.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Append a child node.
    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    /// The node type (ex: `option`, `integer`, `and`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Every attribute, in the order set.
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// The field names referenced by this node.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The child nodes, in order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The attribute `name`, if set.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The attribute `name`, which must be present.
    pub fn require(&self, name: &str) -> Result<&str, ConfigError> {
        self.text(name).ok_or_else(|| ConfigError::InvalidAttribute {
            name: name.to_string(),
            reason: format!("required by '{}'.", self.kind),
        })
    }

    /// The attribute `name` parsed as a `T`, if present.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.text(name)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|error| ConfigError::InvalidAttribute {
                        name: name.to_string(),
                        reason: format!("'{raw}': {error}"),
                    })
            })
            .transpose()
    }

    /// The boolean attribute `name`, or `fallback` when absent.
    pub fn switch(&self, name: &str, fallback: bool) -> Result<bool, ConfigError> {
        Ok(self.parse::<bool>(name)?.unwrap_or(fallback))
    }

    /// The comma separated attribute `name` (empty when absent).
    pub fn list(&self, name: &str) -> Vec<&str> {
        self.text(name)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn collect_fields<'n>(&'n self, out: &mut Vec<&'n str>) {
        out.extend(self.fields.iter().map(String::as_str));

        for child in &self.children {
            child.collect_fields(out);
        }
    }
}

/// Name to factory registry for filters and rules.
///
/// The host application registers its own filters and rules by name at startup, next to the built-ins.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::{Factories, Node, Validator, Value};
///
/// let factories = Factories::with_builtins();
/// let validator = Validator::default();
/// let config = Node::new("config")
///     .child(Node::new("flag").attribute("name", "verbose").attribute("alias", "v"))
///     .child(
///         Node::new("option")
///             .attribute("name", "count")
///             .attribute("default", "1")
///             .child(Node::new("integer").attribute("min", "1")),
///     )
///     .child(Node::new("required").field("v"));
/// factories.load(&validator, &config).unwrap();
///
/// let validated = validator.parse_args(&["-v"]).unwrap();
/// assert_eq!(validated.value("count"), Some(&Value::Integer(1)));
/// assert!(validator.parse_args(&["--count", "2"]).is_err());
/// ```
#[derive(Clone, Default)]
pub struct Factories {
    filters: IndexMap<String, FilterFactory>,
    rules: IndexMap<String, RuleFactory>,
}

impl std::fmt::Debug for Factories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factories")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Factories {
    /// A registry without any factories.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in filters and rules.
    ///
    /// Filters: `integer`, `big-integer`, `decimal`, `big-decimal`, `regex`, `set`, `path`.
    /// Rules: `and`, `or`, `xor`, `not`, `required`, `exactly-one`, `only-known-flags`, `only-known-options`.
    pub fn with_builtins() -> Self {
        builtin::install(Self::new())
    }

    /// Register (or replace) the filter factory for `name`.
    pub fn register_filter(
        mut self,
        name: impl Into<String>,
        factory: impl Fn(&Node) -> Result<SharedFilter, ConfigError> + Send + Sync + 'static,
    ) -> Self {
        self.filters.insert(name.into(), Arc::new(factory));
        self
    }

    /// Register (or replace) the rule factory for `name`.
    pub fn register_rule(
        mut self,
        name: impl Into<String>,
        factory: impl Fn(&Factories, &Node) -> Result<SharedRule, ConfigError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.rules.insert(name.into(), Arc::new(factory));
        self
    }

    /// Whether a filter factory is registered for `name`.
    pub fn knows_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Whether a rule factory is registered for `name`.
    pub fn knows_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Build the filter described by `node`.
    pub fn filter_for(&self, node: &Node) -> Result<SharedFilter, ConfigError> {
        let factory = self
            .filters
            .get(node.kind())
            .ok_or_else(|| ConfigError::UnknownFactory(node.kind().to_string()))?;
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Building filter '{}'.", node.kind());
        }
        factory(node)
    }

    /// Build the rule described by `node`, without checking its field references.
    pub fn build_rule(&self, node: &Node) -> Result<SharedRule, ConfigError> {
        let factory = self
            .rules
            .get(node.kind())
            .ok_or_else(|| ConfigError::UnknownFactory(node.kind().to_string()))?;
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Building rule '{}'.", node.kind());
        }
        factory(self, node)
    }

    /// Build the rule described by `node`.
    ///
    /// Every field it (or any nested rule) references must already be declared in `validator`.
    pub fn rule_for(&self, validator: &Validator, node: &Node) -> Result<SharedRule, ConfigError> {
        let mut fields = Vec::default();
        node.collect_fields(&mut fields);

        if let Some(unknown) = fields.iter().find(|name| validator.kind_of(name).is_none()) {
            return Err(ConfigError::UnknownField(unknown.to_string()));
        }

        self.build_rule(node)
    }

    /// Build the flag, option, argument or rule described by `node`.
    ///
    /// * `flag`: attributes `name`, `alias` (comma separated) and `help`.
    /// * `option`: as for `flag`, plus `default`, `required`, `multiple` and an optional filter child.
    /// * `argument`: attributes `name`, `index`, `default`, `required`, `variadic`, `help` and an optional filter child.
    /// * Anything else is built as a rule (see [`Factories::rule_for`]).
    pub fn declaration_for(
        &self,
        validator: &Validator,
        node: &Node,
    ) -> Result<Declaration, ConfigError> {
        match node.kind() {
            "flag" => {
                let mut flag = CliFlag::new(node.require("name")?);

                for alias in node.list("alias") {
                    flag = flag.alias(alias);
                }

                if let Some(help) = node.text("help") {
                    flag = flag.help(help);
                }

                Ok(flag.into())
            }
            "option" => {
                let mut option = CliOption::new(node.require("name")?);

                for alias in node.list("alias") {
                    option = option.alias(alias);
                }

                if let Some(filter) = self.child_filter(node)? {
                    option = option.shared_filter(filter);
                }

                if let Some(default) = node.text("default") {
                    option = option.default_text(default);
                }

                if node.switch("required", false)? {
                    option = option.required();
                }

                if node.switch("multiple", false)? {
                    option = option.multiple();
                }

                if let Some(help) = node.text("help") {
                    option = option.help(help);
                }

                Ok(option.into())
            }
            "argument" => {
                let index = node
                    .parse::<usize>("index")?
                    .ok_or_else(|| ConfigError::InvalidAttribute {
                        name: "index".to_string(),
                        reason: "required by 'argument'.".to_string(),
                    })?;
                let mut argument = CliArgument::new(node.require("name")?, index);

                if let Some(filter) = self.child_filter(node)? {
                    argument = argument.shared_filter(filter);
                }

                if let Some(default) = node.text("default") {
                    argument = argument.default_text(default);
                }

                if node.switch("required", false)? {
                    argument = argument.required();
                }

                if node.switch("variadic", false)? {
                    argument = argument.variadic();
                }

                if let Some(help) = node.text("help") {
                    argument = argument.help(help);
                }

                Ok(argument.into())
            }
            _ => Ok(Declaration::Rule(self.rule_for(validator, node)?)),
        }
    }

    /// Declare every child of `root` in `validator`, in order.
    ///
    /// Rules may only reference fields declared before them.
    pub fn load(&self, validator: &Validator, root: &Node) -> Result<(), ConfigError> {
        for node in root.children() {
            let declaration = self.declaration_for(validator, node)?;
            validator.add(declaration)?;
        }

        Ok(())
    }

    fn child_filter(&self, node: &Node) -> Result<Option<SharedFilter>, ConfigError> {
        match node.children() {
            [] => Ok(None),
            [filter] => self.filter_for(filter).map(Some),
            _ => Err(ConfigError::InvalidFilter(format!(
                "'{}' accepts at most one filter.",
                node.require("name").unwrap_or(node.kind())
            ))),
        }
    }
}
