use std::sync::Arc;

use crate::error::RuleError;
use crate::model::ValidatedInput;
use crate::rule::{describe_all, Rule, SharedRule};
use crate::validator::Registry;

/// Shared shape of the composite rules: sub-rules plus an optional custom message.
#[derive(Debug, Clone, Default)]
struct Composite {
    rules: Vec<SharedRule>,
    message: Option<String>,
}

impl Composite {
    fn fail(&self, synthesized: impl FnOnce() -> String) -> RuleError {
        RuleError::new(self.message.clone().unwrap_or_else(synthesized))
    }

    fn fail_with(&self, synthesized: impl FnOnce() -> String, cause: RuleError) -> RuleError {
        RuleError::caused_by(self.message.clone().unwrap_or_else(synthesized), cause)
    }
}

macro_rules! composite_builder {
    ($rule:ident) => {
        impl $rule {
            /// A composite without sub-rules.
            pub fn new() -> Self {
                Self::default()
            }

            /// Add a sub-rule.
            pub fn rule(self, rule: impl Rule + 'static) -> Self {
                self.shared(Arc::new(rule))
            }

            /// Add a sub-rule that is shared with other rules.
            pub fn shared(mut self, rule: SharedRule) -> Self {
                self.0.rules.push(rule);
                self
            }

            /// Report `message` instead of the synthesized description on failure.
            pub fn message(mut self, message: impl Into<String>) -> Self {
                self.0.message.replace(message.into());
                self
            }

            /// The sub-rules, in order.
            pub fn rules(&self) -> &[SharedRule] {
                &self.0.rules
            }
        }
    };
}

/// Every sub-rule must pass; stops at the first failure.
#[derive(Debug, Clone, Default)]
pub struct And(Composite);

composite_builder!(And);

impl Rule for And {
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError> {
        for rule in &self.0.rules {
            if let Err(error) = rule.validate(registry, input) {
                return Err(match &self.0.message {
                    Some(message) => RuleError::caused_by(message.clone(), error),
                    None => error,
                });
            }
        }

        Ok(())
    }

    fn describe(&self) -> String {
        describe_all(&self.0.rules, " and ")
    }
}

/// At least one sub-rule must pass.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::{CliFlag, Or, RequiredFields, Validator};
///
/// let validator = Validator::default();
/// validator.add(CliFlag::new("a")).unwrap();
/// validator.add(CliFlag::new("b")).unwrap();
/// validator
///     .add(
///         Or::new()
///             .rule(RequiredFields::new(["a"]))
///             .rule(RequiredFields::new(["b"]))
///             .message("Either -a or -b is needed."),
///     )
///     .unwrap();
///
/// assert!(validator.parse_args(&["-b"]).is_ok());
/// let error = validator.parse_args(&["x"]).unwrap_err();
/// assert_eq!(error.to_string(), "Validation error: Either -a or -b is needed.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Or(Composite);

composite_builder!(Or);

impl Rule for Or {
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError> {
        let mut last: Option<RuleError> = None;

        for rule in &self.0.rules {
            match rule.validate(registry, input) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    last.replace(error);
                }
            }
        }

        let synthesized = || format!("At least one of {} must hold.", self.describe());

        Err(match last {
            Some(cause) => self.0.fail_with(synthesized, cause),
            None => self.0.fail(synthesized),
        })
    }

    fn describe(&self) -> String {
        describe_all(&self.0.rules, " or ")
    }
}

/// Exactly one sub-rule must pass.
#[derive(Debug, Clone, Default)]
pub struct Xor(Composite);

composite_builder!(Xor);

impl Rule for Xor {
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError> {
        let passed = self
            .0
            .rules
            .iter()
            .filter(|rule| rule.validate(registry, input).is_ok())
            .count();

        if passed == 1 {
            Ok(())
        } else {
            Err(self.0.fail(|| {
                format!(
                    "Exactly one of {} must hold, but {passed} did.",
                    self.describe()
                )
            }))
        }
    }

    fn describe(&self) -> String {
        describe_all(&self.0.rules, " xor ")
    }
}

/// None of the sub-rules may pass.
#[derive(Debug, Clone, Default)]
pub struct Not(Composite);

composite_builder!(Not);

impl Rule for Not {
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError> {
        match self
            .0
            .rules
            .iter()
            .find(|rule| rule.validate(registry, input).is_ok())
        {
            Some(rule) => Err(self
                .0
                .fail(|| format!("Must not hold: ({}).", rule.describe()))),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        format!("not {}", describe_all(&self.0.rules, " nor "))
    }
}
