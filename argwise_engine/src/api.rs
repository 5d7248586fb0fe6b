mod field;

pub use field::*;

use std::sync::Arc;

use crate::rule::Rule;

/// Anything that may be added to a [`crate::Validator`].
#[derive(Debug, Clone)]
pub enum Declaration {
    /// A flag.
    Flag(CliFlag),
    /// An option.
    Option(CliOption),
    /// A positional argument.
    Argument(CliArgument),
    /// A rule, run after every field is resolved.
    Rule(Arc<dyn Rule>),
}

impl From<CliFlag> for Declaration {
    fn from(value: CliFlag) -> Self {
        Declaration::Flag(value)
    }
}

impl From<CliOption> for Declaration {
    fn from(value: CliOption) -> Self {
        Declaration::Option(value)
    }
}

impl From<CliArgument> for Declaration {
    fn from(value: CliArgument) -> Self {
        Declaration::Argument(value)
    }
}

impl From<Arc<dyn Rule>> for Declaration {
    fn from(value: Arc<dyn Rule>) -> Self {
        Declaration::Rule(value)
    }
}

impl From<Box<dyn Rule>> for Declaration {
    fn from(value: Box<dyn Rule>) -> Self {
        Declaration::Rule(Arc::from(value))
    }
}
