mod field;
mod logic;

pub use field::*;
pub use logic::*;

use std::sync::Arc;

use crate::error::RuleError;
use crate::model::ValidatedInput;
use crate::validator::{FieldKind, Registry};

/// A cross-field check over the validated values.
///
/// Rules run after every flag, option and argument has been resolved, in registration order.
pub trait Rule: std::fmt::Debug + Send + Sync {
    /// Check `input`, using `registry` to resolve field names.
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError>;

    /// Describe what the rule requires.
    fn describe(&self) -> String;
}

/// A rule shared between declarations (ex: a sub-rule of several composites).
pub type SharedRule = Arc<dyn Rule>;

/// Whether the field `name` (any of its names) holds a value.
/// Flags must be `true`; options and arguments must be present.
pub(crate) fn is_set(registry: &dyn Registry, input: &ValidatedInput, name: &str) -> bool {
    match registry.lookup(name) {
        Some((FieldKind::Flag, id)) => input.flag(id),
        Some((_, id)) => input.value(id).is_some(),
        None => input.is_set(name),
    }
}

fn describe_all(rules: &[SharedRule], separator: &str) -> String {
    rules
        .iter()
        .map(|rule| format!("({})", rule.describe()))
        .collect::<Vec<String>>()
        .join(separator)
}

fn describe_names(names: &[String]) -> String {
    format!("{{{}}}", names.join(", "))
}

macro_rules! declarable {
    ($($rule:ty),* $(,)?) => {
        $(
            impl From<$rule> for crate::api::Declaration {
                fn from(value: $rule) -> Self {
                    crate::api::Declaration::Rule(Arc::new(value))
                }
            }
        )*
    };
}

declarable!(
    And,
    Or,
    Xor,
    Not,
    RequiredFields,
    ExactlyOneOf,
    OnlyKnownFlags,
    OnlyKnownOptions,
);
