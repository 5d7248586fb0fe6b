use crate::api::{CliArgument, CliFlag, CliOption, Declaration};
use crate::error::ConfigError;
use crate::rule::SharedRule;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// What a declared name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A declared flag.
    Flag,
    /// A declared option.
    Option,
    /// A declared positional argument.
    Argument,
}

/// Name lookups over the declared fields.
///
/// Used by the tokenizer to tell flags from options, and by rules to resolve field names.
pub trait Registry {
    /// Resolve `name` (any of a field's names) to its kind and primary identifier.
    fn lookup(&self, name: &str) -> Option<(FieldKind, &str)>;

    /// Whether `name` is a name of a flag.
    fn knows_flag(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some((FieldKind::Flag, _)))
    }

    /// Whether `name` is a name of an option.
    fn knows_option(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some((FieldKind::Option, _)))
    }

    /// Whether `name` is the identifier of an argument.
    fn knows_argument(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some((FieldKind::Argument, _)))
    }
}

/// The declared fields and rules behind a [`crate::Validator`].
#[derive(Debug, Default)]
pub(crate) struct Declarations {
    pub(super) flags: Vec<CliFlag>,
    pub(super) options: Vec<CliOption>,
    // Sorted by index.
    pub(super) arguments: Vec<CliArgument>,
    pub(super) rules: Vec<SharedRule>,
}

impl Registry for Declarations {
    fn lookup(&self, name: &str) -> Option<(FieldKind, &str)> {
        self.flags
            .iter()
            .find(|flag| flag.is_named(name))
            .map(|flag| (FieldKind::Flag, flag.id()))
            .or_else(|| {
                self.options
                    .iter()
                    .find(|option| option.is_named(name))
                    .map(|option| (FieldKind::Option, option.id()))
            })
            .or_else(|| {
                self.arguments
                    .iter()
                    .find(|argument| argument.id() == name)
                    .map(|argument| (FieldKind::Argument, argument.id()))
            })
    }
}

impl Declarations {
    /// Add a declaration, or reject it without changing anything.
    pub(crate) fn add(&mut self, declaration: Declaration) -> Result<(), ConfigError> {
        match declaration {
            Declaration::Flag(flag) => {
                self.check_names(flag.id(), flag.names())?;
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Adding flag {:?}.", flag.names());
                }
                self.flags.push(flag);
            }
            Declaration::Option(option) => {
                self.check_names(option.id(), option.names())?;
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Adding option {:?}.", option.names());
                }
                self.options.push(option);
            }
            Declaration::Argument(argument) => {
                self.check_names(argument.id(), &[argument.id().to_string()])?;
                self.check_index(&argument)?;
                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "Adding argument '{}' at index {}.",
                        argument.id(),
                        argument.index()
                    );
                }
                let position = self
                    .arguments
                    .partition_point(|existing| existing.index() < argument.index());
                self.arguments.insert(position, argument);
            }
            Declaration::Rule(rule) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Adding rule '{}'.", rule.describe());
                }
                self.rules.push(rule);
            }
        }

        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.flags.clear();
        self.options.clear();
        self.arguments.clear();
        self.rules.clear();
    }

    fn check_names(&self, primary: &str, names: &[String]) -> Result<(), ConfigError> {
        for name in names {
            if name.is_empty() {
                return Err(ConfigError::Unnamed);
            }

            if let Some((_, existing)) = self.lookup(name) {
                return Err(if existing == primary {
                    ConfigError::DuplicateName(name.clone())
                } else {
                    ConfigError::Ambiguous {
                        name: name.clone(),
                        existing: existing.to_string(),
                    }
                });
            }
        }

        Ok(())
    }

    fn check_index(&self, argument: &CliArgument) -> Result<(), ConfigError> {
        if self
            .arguments
            .iter()
            .any(|existing| existing.index() == argument.index())
        {
            return Err(ConfigError::DuplicateIndex(argument.index()));
        }

        if let Some(variadic) = self.arguments.iter().find(|a| a.is_variadic()) {
            if argument.is_variadic() || argument.index() > variadic.index() {
                return Err(ConfigError::VariadicOrder {
                    name: argument.id().to_string(),
                    index: argument.index(),
                    variadic: variadic.id().to_string(),
                    variadic_index: variadic.index(),
                });
            }
        }

        if argument.is_variadic() {
            if let Some(higher) = self
                .arguments
                .iter()
                .find(|existing| existing.index() > argument.index())
            {
                return Err(ConfigError::VariadicOrder {
                    name: higher.id().to_string(),
                    index: higher.index(),
                    variadic: argument.id().to_string(),
                    variadic_index: argument.index(),
                });
            }
        }

        Ok(())
    }
}
