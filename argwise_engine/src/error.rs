use thiserror::Error;

/// Any failure surfaced by `argwise`.
#[derive(Debug, Error)]
pub enum Error {
    /// The raw input could not be tokenized.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The tokenized input violated a declared constraint.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The declarations themselves are inconsistent.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Malformed raw input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A double quote was never closed; holds the character position of the opening quote.
    #[error("Unterminated quote starting at character {0}.")]
    UnterminatedQuote(usize),

    /// The last token is an option, with no value following it.
    #[error("Missing value for option '{0}'.")]
    MissingValue(String),

    /// The flag and option markers are identical, and no registry was given to tell the token apart.
    #[error("Cannot tell flag '{0}' from option without a registry (flag and option markers are identical).")]
    RegistryRequired(String),
}

/// A declared constraint was not met.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required option was not given.
    #[error("Required option '{0}' not set.")]
    RequiredOption(String),

    /// A single-valued option was given more than once.
    #[error("Option '{0}' may only be set once.")]
    MultipleValues(String),

    /// A required argument was not given.
    #[error("Must specify at least {required} arguments ('{name}' is missing).")]
    MissingArgument {
        /// The argument identifier.
        name: String,
        /// How many positional tokens the argument needs.
        required: usize,
    },

    /// A filter rejected the value of a field.
    #[error("{field}: {source}")]
    Filter {
        /// The primary identifier of the field.
        field: String,
        /// Why the filter rejected the value.
        #[source]
        source: FilterError,
    },

    /// A rule was not met.
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Registration or declaration time inconsistencies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A field has an empty name.
    #[error("A field must have at least one name.")]
    Unnamed,

    /// The field is already declared.
    #[error("Cannot duplicate the name '{0}'.")]
    DuplicateName(String),

    /// One of the field's names belongs to another field.
    #[error("The name '{name}' is already used by '{existing}'.")]
    Ambiguous {
        /// The name in conflict.
        name: String,
        /// The primary identifier of the field already using it.
        existing: String,
    },

    /// Another argument already holds the index.
    #[error("Cannot duplicate the argument index {0}.")]
    DuplicateIndex(usize),

    /// The variadic argument would not hold the highest index.
    #[error("Argument '{name}' (index {index}) conflicts with variadic argument '{variadic}' (index {variadic_index}); the variadic argument must have the highest index.")]
    VariadicOrder {
        /// The argument being added.
        name: String,
        /// Its index.
        index: usize,
        /// The variadic argument in conflict.
        variadic: String,
        /// Its index.
        variadic_index: usize,
    },

    /// An environment marker is empty.
    #[error("Environment markers must not be empty.")]
    EmptyMarker,

    /// A filter cannot be built from its settings.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A rule cannot be built from its settings.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// No factory is registered under the node type.
    #[error("No factory registered for '{0}'.")]
    UnknownFactory(String),

    /// A configuration attribute is missing or malformed.
    #[error("Attribute '{name}' is invalid: {reason}")]
    InvalidAttribute {
        /// The attribute name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A rule names a field that is not declared.
    #[error("Rule references unknown field '{0}'.")]
    UnknownField(String),
}

/// A value filter rejected a raw string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct FilterError {
    reason: String,
}

impl FilterError {
    /// A rejection for `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the value was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A rule was not met.
///
/// Composite rules chain the failure of their last sub-rule as the `source`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleError {
    message: String,
    #[source]
    source: Option<Box<RuleError>>,
}

impl RuleError {
    /// A failure reporting `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A failure wrapping the failure of a sub-rule.
    pub fn caused_by(message: impl Into<String>, cause: RuleError) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The sub-rule failure behind this one, if any.
    pub fn cause(&self) -> Option<&RuleError> {
        self.source.as_deref()
    }
}
