use crate::error::ValidationError;
use crate::filter::{apply, SharedFilter};
use crate::model::{Input, ValidatedInput, Value};
use crate::validator::registry::{Declarations, Registry};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Resolve the raw `input` in the fixed order: flags, options, arguments, then rules.
pub(super) fn resolve(
    declarations: &Declarations,
    input: &Input,
) -> Result<ValidatedInput, ValidationError> {
    let mut validated = ValidatedInput::default();
    resolve_flags(declarations, input, &mut validated);
    resolve_options(declarations, input, &mut validated)?;
    resolve_arguments(declarations, input, &mut validated)?;

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Checking {} rules.", declarations.rules.len());
    }

    for rule in &declarations.rules {
        rule.validate(declarations, &validated)?;
    }

    Ok(validated)
}

fn resolve_flags(declarations: &Declarations, input: &Input, validated: &mut ValidatedInput) {
    for flag in &declarations.flags {
        let present = flag.names().iter().any(|name| input.has_flag(name));
        validated.set_flag(flag.id(), present);
    }

    // Undeclared flags are kept; rejecting them is up to a rule.
    for name in input.flags() {
        if !declarations.knows_flag(name) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Keeping undeclared flag '{name}'.");
            }
            validated.set_flag(name.as_str(), true);
        }
    }
}

fn resolve_options(
    declarations: &Declarations,
    input: &Input,
    validated: &mut ValidatedInput,
) -> Result<(), ValidationError> {
    for option in &declarations.options {
        let raw = input.occurrences_of(option.names());

        if raw.is_empty() && option.is_required() {
            return Err(ValidationError::RequiredOption(option.id().to_string()));
        }

        if raw.len() > 1 && !option.allows_multiple() {
            return Err(ValidationError::MultipleValues(option.id().to_string()));
        }

        let mut values = filter_all(option.id(), option.value_filter(), raw)?;
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Option '{}' resolved to {values:?}.", option.id());
        }

        let value = if values.is_empty() {
            option.initial().map(|initial| {
                if option.allows_multiple() {
                    as_list(initial)
                } else {
                    initial.clone()
                }
            })
        } else if option.allows_multiple() {
            Some(Value::List(values))
        } else {
            values.pop()
        };

        if let Some(value) = value {
            validated.set_value(option.id(), value);
        }
    }

    // Undeclared options pass through unfiltered.
    for (name, raw) in input.options() {
        if !declarations.knows_option(name) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Keeping undeclared option '{name}'.");
            }
            let values = raw.iter().map(|value| Value::from(value.as_str()));
            validated.set_value(name.as_str(), Value::List(values.collect()));
        }
    }

    Ok(())
}

fn resolve_arguments(
    declarations: &Declarations,
    input: &Input,
    validated: &mut ValidatedInput,
) -> Result<(), ValidationError> {
    let positional = input.arguments();

    for argument in &declarations.arguments {
        let index = argument.index();

        let value = match positional.get(index) {
            None if argument.is_required() => {
                return Err(ValidationError::MissingArgument {
                    name: argument.id().to_string(),
                    required: index.saturating_add(1),
                });
            }
            None => argument.initial().map(|initial| {
                if argument.is_variadic() {
                    Value::List(vec![initial.clone()])
                } else {
                    initial.clone()
                }
            }),
            Some(_) if argument.is_variadic() => {
                // The variadic argument holds the highest index, so it takes the rest.
                let values = filter_all(argument.id(), argument.value_filter(), &positional[index..])?;
                Some(Value::List(values))
            }
            Some(raw) => Some(filter_one(argument.id(), argument.value_filter(), raw)?),
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Argument '{}' resolved to {value:?}.", argument.id());
        }

        match value {
            Some(value) => validated.set_value(argument.id(), value),
            // An undeclared option of the same name must not stand in for the argument.
            None => validated.clear_value(argument.id()),
        }
    }

    Ok(())
}

fn filter_one(
    field: &str,
    filter: Option<&SharedFilter>,
    raw: &str,
) -> Result<Value, ValidationError> {
    apply(filter, raw).map_err(|source| ValidationError::Filter {
        field: field.to_string(),
        source,
    })
}

fn filter_all<I, S>(
    field: &str,
    filter: Option<&SharedFilter>,
    raw: I,
) -> Result<Vec<Value>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|value| filter_one(field, filter, value.as_ref()))
        .collect()
}

/// A multi-valued default, unless it already is a list.
fn as_list(initial: &Value) -> Value {
    match initial {
        Value::List(_) => initial.clone(),
        _ => Value::List(vec![initial.clone()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CliArgument, CliFlag, CliOption, Declaration};
    use crate::error::{FilterError, RuleError};
    use crate::filter::{IntegerFilter, SetFilter};
    use crate::model::Environment;
    use crate::rule::test::Fixed;
    use crate::filter::{Existence, PathFilter};
    use crate::rule::{OnlyKnownFlags, OnlyKnownOptions, RequiredFields};
    use crate::tokens::tokenize;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn declarations(items: Vec<Declaration>) -> Declarations {
        let mut declarations = Declarations::default();

        for item in items {
            declarations.add(item).unwrap();
        }

        declarations
    }

    fn run(declarations: &Declarations, tokens: &[&str]) -> Result<ValidatedInput, ValidationError> {
        let input = tokenize(tokens, &Environment::unix(), Some(declarations)).unwrap();
        resolve(declarations, &input)
    }

    #[rstest]
    #[case(vec![], false)]
    #[case(vec!["-v"], true)]
    #[case(vec!["-verbose"], true)]
    #[case(vec!["-v", "-verbose"], true)]
    fn flags_by_any_name(#[case] tokens: Vec<&str>, #[case] expected: bool) {
        let declarations = declarations(vec![CliFlag::new("verbose").alias("v").into()]);
        let validated = run(&declarations, &tokens).unwrap();
        assert_eq!(validated.flag_values().get("verbose"), Some(&expected));
        assert_eq!(validated.flag_values().len(), 1);
    }

    #[test]
    fn unknown_flags_are_kept() {
        let permissive = declarations(vec![CliFlag::new("v").into()]);
        let validated = run(&permissive, &["-x", "-v"]).unwrap();
        assert!(validated.flag("x"));
        assert!(validated.flag("v"));

        let strict = declarations(vec![
            CliFlag::new("v").into(),
            OnlyKnownFlags::new().into(),
        ]);
        let error = run(&strict, &["-x"]).unwrap_err();
        assert_contains!(error.to_string(), "Unknown flag 'x'.");
    }

    #[test]
    fn required_option() {
        let declarations = declarations(vec![CliOption::new("out").alias("o").required().into()]);
        assert_matches!(
            run(&declarations, &[]),
            Err(ValidationError::RequiredOption(name)) if name == "out"
        );
        let validated = run(&declarations, &["--o", "x"]).unwrap();
        assert_eq!(validated.value("out"), Some(&Value::from("x")));
    }

    #[test]
    fn single_value_option_given_twice() {
        let declarations = declarations(vec![CliOption::new("out").alias("o").into()]);
        assert_matches!(
            run(&declarations, &["--out", "a", "--o", "b"]),
            Err(ValidationError::MultipleValues(name)) if name == "out"
        );
    }

    #[test]
    fn multiple_values_collected_across_names() {
        let declarations = declarations(vec![CliOption::new("num")
            .alias("n")
            .filter(IntegerFilter::new())
            .multiple()
            .into()]);
        let validated = run(&declarations, &["--n", "1", "--num", "2", "--n", "3"]).unwrap();
        assert_eq!(
            validated.value("num"),
            Some(&Value::List(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3)
            ]))
        );
    }

    #[rstest]
    #[case(CliOption::new("n").default_text("7"), Some(Value::Text("7".to_string())))]
    #[case(CliOption::new("n").filter(IntegerFilter::new()).default_text("7"), Some(Value::Integer(7)))]
    #[case(CliOption::new("n").filter(IntegerFilter::new()).default_text("seven"), Some(Value::Text("seven".to_string())))]
    #[case(CliOption::new("n").filter(IntegerFilter::new()).default_text("7").multiple(), Some(Value::List(vec![Value::Integer(7)])))]
    #[case(CliOption::new("n").default_value(Value::List(vec![Value::Integer(1), Value::Integer(2)])).multiple(), Some(Value::List(vec![Value::Integer(1), Value::Integer(2)])))]
    #[case(CliOption::new("n"), None)]
    #[case(CliOption::new("n").multiple(), None)]
    fn option_defaults(#[case] option: CliOption, #[case] expected: Option<Value>) {
        let declarations = declarations(vec![option.into()]);
        let validated = run(&declarations, &[]).unwrap();
        assert_eq!(validated.value("n"), expected.as_ref());
    }

    #[test]
    fn option_filter_failure_names_field() {
        let declarations = declarations(vec![CliOption::new("count")
            .alias("c")
            .filter(IntegerFilter::new().min(10).max(20))
            .into()]);
        let error = run(&declarations, &["--c", "25"]).unwrap_err();
        assert_matches!(
            &error,
            ValidationError::Filter { field, source }
                if field == "count" && source == &FilterError::new("'25' is not within [10, 20].")
        );
        assert_eq!(error.to_string(), "count: '25' is not within [10, 20].");
    }

    #[test]
    fn unknown_options_pass_through() {
        let declarations = declarations(vec![CliOption::new("known").into()]);
        let validated = run(&declarations, &["--other", "1", "--other", "two"]).unwrap();
        assert_eq!(
            validated.value("other"),
            Some(&Value::List(vec!["1".into(), "two".into()]))
        );
        assert_eq!(validated.value("known"), None);
    }

    #[test]
    fn set_filter_returns_canonical_value() {
        let declarations = declarations(vec![CliOption::new("mode")
            .filter(SetFilter::new(["fast", "Slow"], false).unwrap())
            .into()]);
        let validated = run(&declarations, &["--mode", "SLOW"]).unwrap();
        assert_eq!(validated.value("mode"), Some(&Value::from("Slow")));
    }

    #[rstest]
    #[case(vec!["a"], Some("a"), None)]
    #[case(vec!["a", "b"], Some("a"), Some("b"))]
    #[case(vec!["a", "b", "c"], Some("a"), Some("b"))]
    #[case(vec![], None, None)]
    fn optional_arguments(
        #[case] tokens: Vec<&str>,
        #[case] first: Option<&str>,
        #[case] second: Option<&str>,
    ) {
        let declarations = declarations(vec![
            CliArgument::new("second", 1).into(),
            CliArgument::new("first", 0).into(),
        ]);
        let validated = run(&declarations, &tokens).unwrap();
        assert_eq!(validated.value("first").and_then(Value::as_str), first);
        assert_eq!(validated.value("second").and_then(Value::as_str), second);
    }

    #[rstest]
    #[case(vec![], 1, "first")]
    #[case(vec!["a"], 2, "second")]
    fn missing_required_argument(
        #[case] tokens: Vec<&str>,
        #[case] expected_required: usize,
        #[case] expected_name: &str,
    ) {
        let declarations = declarations(vec![
            CliArgument::new("first", 0).required().into(),
            CliArgument::new("second", 1).required().into(),
        ]);
        assert_matches!(
            run(&declarations, &tokens),
            Err(ValidationError::MissingArgument { name, required })
                if name == expected_name && required == expected_required
        );
    }

    #[test]
    fn variadic_takes_the_rest() {
        let declarations = declarations(vec![
            CliArgument::new("command", 0).required().into(),
            CliArgument::new("numbers", 1)
                .filter(IntegerFilter::new())
                .variadic()
                .into(),
        ]);
        let validated = run(&declarations, &["sum", "1", "-2", "3"]).unwrap();
        assert_eq!(validated.value("command"), Some(&Value::from("sum")));
        assert_eq!(
            validated.value("numbers"),
            Some(&Value::List(vec![
                Value::Integer(1),
                Value::Integer(-2),
                Value::Integer(3)
            ]))
        );

        let error = run(&declarations, &["sum", "1", "x"]).unwrap_err();
        assert_eq!(error.to_string(), "numbers: 'x' is not an integer.");
    }

    #[test]
    fn variadic_default_is_wrapped() {
        let declarations = declarations(vec![CliArgument::new("rest", 0)
            .default_text("none")
            .variadic()
            .into()]);
        let validated = run(&declarations, &[]).unwrap();
        assert_eq!(
            validated.value("rest"),
            Some(&Value::List(vec![Value::from("none")]))
        );
    }

    #[test]
    fn argument_filter_failure() {
        let declarations = declarations(vec![CliArgument::new("count", 0)
            .filter(IntegerFilter::new())
            .default_text("1")
            .into()]);
        assert_eq!(
            run(&declarations, &[]).unwrap().value("count"),
            Some(&Value::Integer(1))
        );
        assert_matches!(
            run(&declarations, &["one"]),
            Err(ValidationError::Filter { field, .. }) if field == "count"
        );
    }

    #[test]
    fn rules_run_in_order() {
        let declarations = declarations(vec![
            Declaration::Rule(std::sync::Arc::new(Fixed(true, "first"))),
            Declaration::Rule(std::sync::Arc::new(Fixed(false, "second"))),
            Declaration::Rule(std::sync::Arc::new(Fixed(false, "third"))),
        ]);
        assert_matches!(
            run(&declarations, &[]),
            Err(ValidationError::Rule(error)) if error == RuleError::new("second")
        );
    }

    #[test]
    fn rules_see_resolved_values() {
        let declarations = declarations(vec![
            CliOption::new("out").alias("o").default_text("a.txt").into(),
            CliArgument::new("file", 0).into(),
            RequiredFields::new(["o", "file"]).into(),
        ]);
        assert!(run(&declarations, &["x"]).is_ok());
        let error = run(&declarations, &[]).unwrap_err();
        assert_eq!(error.to_string(), "'file' is required.");
    }

    #[test]
    fn undeclared_option_does_not_fill_argument() {
        let directory = tempfile::tempdir().unwrap();
        let missing = directory.path().join("missing.txt");
        let missing = missing.to_string_lossy();
        let declarations = declarations(vec![
            CliArgument::new("input", 0)
                .filter(PathFilter::new().existence(Existence::MustExist))
                .into(),
            OnlyKnownOptions::new().into(),
        ]);

        let validated = run(&declarations, &["--input", &*missing]).unwrap();
        assert_eq!(validated.value("input"), None);

        let present = directory.path().to_string_lossy();
        let validated = run(&declarations, &["--input", &*missing, &*present]).unwrap();
        assert_eq!(
            validated.value("input"),
            Some(&Value::Path(directory.path().to_path_buf()))
        );
    }

    #[test]
    fn undeclared_option_does_not_satisfy_required_argument() {
        let declarations = declarations(vec![
            CliArgument::new("input", 0).into(),
            RequiredFields::new(["input"]).into(),
        ]);
        let error = run(&declarations, &["--input", "x"]).unwrap_err();
        assert_eq!(error.to_string(), "'input' is required.");
    }

    #[test]
    fn missing_argument_at_highest_index() {
        let declarations = declarations(vec![CliArgument::new("last", usize::MAX).required().into()]);
        assert_matches!(
            run(&declarations, &[]),
            Err(ValidationError::MissingArgument { name, required: usize::MAX }) if name == "last"
        );
    }
}
