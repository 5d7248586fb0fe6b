use crate::error::RuleError;
use crate::model::ValidatedInput;
use crate::rule::{describe_names, is_set, Rule};
use crate::validator::{FieldKind, Registry};

/// Every named field must be set.
///
/// Names are resolved through the registry, so aliases may be used.
#[derive(Debug, Clone)]
pub struct RequiredFields {
    names: Vec<String>,
    message: Option<String>,
}

impl RequiredFields {
    /// Require every field in `names`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    /// Report `message` instead of naming the missing field.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message.replace(message.into());
        self
    }

    /// The referenced field names, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Rule for RequiredFields {
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError> {
        match self
            .names
            .iter()
            .find(|name| !is_set(registry, input, name))
        {
            Some(missing) => Err(RuleError::new(
                self.message
                    .clone()
                    .unwrap_or_else(|| format!("'{missing}' is required.")),
            )),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        format!("all of {} set", describe_names(&self.names))
    }
}

/// Exactly one of the named fields must be set.
///
/// The names are scanned in order, and a conflict is only reported for two *adjacent* names that are both set.
/// So for `[a, b, c]`, setting `a` and `c` (but not `b`) passes.
#[derive(Debug, Clone)]
pub struct ExactlyOneOf {
    names: Vec<String>,
    message: Option<String>,
}

impl ExactlyOneOf {
    /// Require exactly one of the fields in `names`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    /// Report `message` instead of the synthesized description on failure.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message.replace(message.into());
        self
    }

    /// The referenced field names, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn fail(&self, synthesized: String) -> RuleError {
        RuleError::new(self.message.clone().unwrap_or(synthesized))
    }
}

impl Rule for ExactlyOneOf {
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError> {
        let mut any_set = false;
        let mut previous: Option<&str> = None;

        for name in &self.names {
            let set = is_set(registry, input, name);

            if set {
                if let Some(previous) = previous {
                    return Err(self.fail(format!(
                        "'{previous}' and '{name}' are mutually exclusive."
                    )));
                }
            }

            any_set |= set;
            previous = set.then_some(name.as_str());
        }

        if any_set {
            Ok(())
        } else {
            Err(self.fail(format!(
                "One of {} must be set.",
                describe_names(&self.names)
            )))
        }
    }

    fn describe(&self) -> String {
        format!("exactly one of {} set", describe_names(&self.names))
    }
}

/// Rejects flags that were not declared.
#[derive(Debug, Clone, Default)]
pub struct OnlyKnownFlags {
    message: Option<String>,
}

impl OnlyKnownFlags {
    /// A rule with the default message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `message` instead of naming the unknown flag.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message.replace(message.into());
        self
    }
}

impl Rule for OnlyKnownFlags {
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError> {
        match input
            .flag_values()
            .iter()
            .find(|(name, set)| **set && !registry.knows_flag(name))
        {
            Some((name, _)) => Err(RuleError::new(
                self.message
                    .clone()
                    .unwrap_or_else(|| format!("Unknown flag '{name}'.")),
            )),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        "only declared flags".to_string()
    }
}

/// Rejects options that were not declared.
///
/// Argument values share the option map, so declared argument identifiers are accepted too.
#[derive(Debug, Clone, Default)]
pub struct OnlyKnownOptions {
    message: Option<String>,
}

impl OnlyKnownOptions {
    /// A rule with the default message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `message` instead of naming the unknown option.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message.replace(message.into());
        self
    }
}

impl Rule for OnlyKnownOptions {
    fn validate(&self, registry: &dyn Registry, input: &ValidatedInput) -> Result<(), RuleError> {
        match input
            .option_values()
            .keys()
            .find(|name| {
                !matches!(
                    registry.lookup(name),
                    Some((FieldKind::Option | FieldKind::Argument, _))
                )
            })
        {
            Some(name) => Err(RuleError::new(
                self.message
                    .clone()
                    .unwrap_or_else(|| format!("Unknown option '{name}'.")),
            )),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        "only declared options".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::rule::test::Nothing;
    use rstest::rstest;

    /// Knows `v`/`verbose` as a flag, `out`/`o` as an option and `file` as an argument.
    struct Known;

    impl Registry for Known {
        fn lookup(&self, name: &str) -> Option<(FieldKind, &str)> {
            match name {
                "v" | "verbose" => Some((FieldKind::Flag, "verbose")),
                "o" | "out" => Some((FieldKind::Option, "out")),
                "file" => Some((FieldKind::Argument, "file")),
                _ => None,
            }
        }
    }

    fn input(set: &[&str]) -> ValidatedInput {
        set.iter()
            .fold(ValidatedInput::default(), |validated, name| {
                validated.with_value(name, "x")
            })
    }

    #[test]
    fn required_by_alias() {
        let validated = ValidatedInput::default()
            .with_flag("verbose", true)
            .with_value("out", "a.txt");
        let rule = RequiredFields::new(["v", "o"]);
        assert!(rule.validate(&Known, &validated).is_ok());
    }

    #[test]
    fn required_flag_false_is_unset() {
        let validated = ValidatedInput::default()
            .with_flag("verbose", false)
            .with_value("out", "a.txt");
        let error = RequiredFields::new(["out", "verbose"])
            .validate(&Known, &validated)
            .unwrap_err();
        assert_eq!(error.message(), "'verbose' is required.");
    }

    #[test]
    fn required_names_missing_field() {
        let validated = ValidatedInput::default().with_value("out", "a.txt");
        let error = RequiredFields::new(["out", "file"])
            .validate(&Known, &validated)
            .unwrap_err();
        assert_eq!(error.message(), "'file' is required.");

        let error = RequiredFields::new(["file"])
            .message("Give me a file.")
            .validate(&Known, &validated)
            .unwrap_err();
        assert_eq!(error.message(), "Give me a file.");
    }

    #[rstest]
    #[case(&["b"], true)]
    #[case(&["a"], true)]
    #[case(&["c"], true)]
    #[case(&["a", "b"], false)]
    #[case(&["b", "c"], false)]
    #[case(&["a", "b", "c"], false)]
    #[case(&[], false)]
    fn exactly_one(#[case] set: &[&str], #[case] expected_ok: bool) {
        let rule = ExactlyOneOf::new(["a", "b", "c"]);
        assert_eq!(rule.validate(&Nothing, &input(set)).is_ok(), expected_ok);
    }

    #[test]
    fn exactly_one_only_checks_adjacent_names() {
        // 'a' and 'c' are both set, but never adjacent in the scan.
        let rule = ExactlyOneOf::new(["a", "b", "c"]);
        assert!(rule.validate(&Nothing, &input(&["a", "c"])).is_ok());
    }

    #[test]
    fn exactly_one_messages() {
        let rule = ExactlyOneOf::new(["a", "b", "c"]);
        assert_eq!(
            rule.validate(&Nothing, &input(&["a", "b"]))
                .unwrap_err()
                .message(),
            "'a' and 'b' are mutually exclusive."
        );
        assert_eq!(
            rule.validate(&Nothing, &input(&[])).unwrap_err().message(),
            "One of {a, b, c} must be set."
        );
        assert_eq!(
            rule.message("pick one")
                .validate(&Nothing, &input(&[]))
                .unwrap_err()
                .message(),
            "pick one"
        );
    }

    #[test]
    fn only_known_flags() {
        let validated = ValidatedInput::default()
            .with_flag("verbose", true)
            .with_flag("x", false);
        assert!(OnlyKnownFlags::new().validate(&Known, &validated).is_ok());

        let validated = validated.with_flag("x", true);
        assert_eq!(
            OnlyKnownFlags::new()
                .validate(&Known, &validated)
                .unwrap_err()
                .message(),
            "Unknown flag 'x'."
        );
    }

    #[test]
    fn only_known_options() {
        let validated = ValidatedInput::default()
            .with_value("out", "a")
            .with_value("file", "b");
        assert!(OnlyKnownOptions::new().validate(&Known, &validated).is_ok());

        let flagged = validated.clone().with_value("verbose", "x");
        assert_eq!(
            OnlyKnownOptions::new()
                .validate(&Known, &flagged)
                .unwrap_err()
                .message(),
            "Unknown option 'verbose'."
        );

        let validated = validated.with_value("extra", Value::List(vec!["1".into()]));
        assert_eq!(
            OnlyKnownOptions::new()
                .validate(&Known, &validated)
                .unwrap_err()
                .message(),
            "Unknown option 'extra'."
        );
    }
}
