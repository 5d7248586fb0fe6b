#[macro_use]
extern crate assert_matches;

use argwise::prelude::*;
use argwise::{
    tokenize, CliArgument, CliFlag, CliOption, ConfigError, Environment, Error, ExactlyOneOf,
    Existence, Factories, IntegerFilter, Node, ParseError, PathFilter, SetFilter, ValidationError,
    Validator, Value,
};
use rstest::rstest;

fn greeter() -> Validator {
    let validator = Validator::default();
    validator.add(CliFlag::new("v")).unwrap();
    validator
        .add(CliOption::new("name").default_text("world"))
        .unwrap();
    validator
        .add(CliArgument::new("greeting", 0).required())
        .unwrap();
    validator
}

#[test]
fn given_option() {
    let validated = greeter().parse_args(&["--name", "Bob", "hi"]).unwrap();

    assert!(!validated.flag("v"));
    assert_eq!(validated.value("name"), Some(&Value::from("Bob")));
    assert_eq!(validated.value("greeting"), Some(&Value::from("hi")));
}

#[test]
fn default_option() {
    let validated = greeter().parse_args(&["hi"]).unwrap();

    assert_eq!(validated.value("name"), Some(&Value::from("world")));
    assert_eq!(validated.value("greeting"), Some(&Value::from("hi")));
}

#[test]
fn missing_greeting() {
    let error = greeter().parse_args(&["-v"]).unwrap_err();

    assert_matches!(
        error,
        Error::Validation(ValidationError::MissingArgument { ref name, required: 1 }) if name == "greeting"
    );
    assert_eq!(
        error.to_string(),
        "Validation error: Must specify at least 1 arguments ('greeting' is missing)."
    );
}

#[rstest]
#[case(&["-b"], true)]
#[case(&["-c"], true)]
#[case(&["-a", "-c"], true)]
#[case(&["-a", "-b"], false)]
#[case(&["-b", "-c"], false)]
#[case(&[], false)]
fn exactly_one_of(#[case] tokens: &[&str], #[case] passes: bool) {
    let validator = Validator::default();
    for name in ["a", "b", "c"] {
        validator.add(CliFlag::new(name)).unwrap();
    }
    validator.add(ExactlyOneOf::new(["a", "b", "c"])).unwrap();

    assert_eq!(validator.parse_args(tokens).is_ok(), passes);
}

#[test]
fn quoted_line() {
    let validator = Validator::default();
    let input = validator
        .tokenize_line(r#"-v --msg "hello world" arg1"#)
        .unwrap();

    assert!(input.has_flag("v"));
    assert_eq!(input.option_values("msg"), &["hello world".to_string()]);
    assert_eq!(input.arguments(), &["arg1".to_string()]);
}

#[test]
fn unterminated_quote() {
    let validator = Validator::default();

    assert_matches!(
        validator.tokenize_line(r#"--msg "unterminated"#),
        Err(ParseError::UnterminatedQuote(6))
    );
    assert_matches!(
        validator.parse_line(r#"--msg "unterminated"#),
        Err(Error::Parse(ParseError::UnterminatedQuote(_)))
    );
}

#[test]
fn ambiguous_markers() {
    let environment = Environment::new("-", "-", '\\').unwrap();
    let validator = Validator::new(environment.clone());
    validator.add(CliOption::new("out")).unwrap();

    let input = validator.tokenize(&["-out", "file.txt"]).unwrap();
    assert_eq!(input.option_values("out"), &["file.txt".to_string()]);
    assert!(input.arguments().is_empty());

    let input = validator.tokenize(&["-verbose"]).unwrap();
    assert!(input.has_flag("verbose"));

    assert_matches!(
        tokenize(&["-out", "file.txt"], &environment, None),
        Err(ParseError::RegistryRequired(ref token)) if token == "-out"
    );
}

#[rstest]
#[case("A", false, Some("a"))]
#[case("b", false, Some("b"))]
#[case("A", true, None)]
#[case("a", true, Some("a"))]
fn set_filter_casing(#[case] raw: &str, #[case] case_sensitive: bool, #[case] expected: Option<&str>) {
    let filter = SetFilter::new(["a", "b"], case_sensitive).unwrap();

    assert_eq!(filter.parse(raw).ok(), expected.map(Value::from));
}

#[rstest]
#[case("25", None)]
#[case("9", None)]
#[case("15", Some(15))]
#[case("10", Some(10))]
#[case("20", Some(20))]
fn integer_bounds(#[case] raw: &str, #[case] expected: Option<i64>) {
    let filter = IntegerFilter::new().min(10).max(20);

    assert_eq!(filter.parse(raw).ok(), expected.map(Value::Integer));
}

#[test]
fn variadic_must_be_last() {
    let validator = Validator::default();
    validator
        .add(CliArgument::new("rest", 2).variadic())
        .unwrap();

    assert_matches!(
        validator.add(CliArgument::new("after", 3)),
        Err(ConfigError::VariadicOrder { ref name, index: 3, .. }) if name == "after"
    );
    assert_eq!(validator.arguments().len(), 1);
}

#[test]
fn default_round_trip() {
    let filter = IntegerFilter::new().min(1).max(10);
    let option = CliOption::new("times")
        .filter(filter.clone())
        .default_text("3");
    let default = option.initial().cloned().unwrap();

    assert_eq!(filter.parse(&default.to_string()).unwrap(), default);
}

#[test]
fn parse_is_idempotent() {
    let validator = greeter();
    let input = validator.tokenize(&["-v", "--name", "Bob", "hi"]).unwrap();

    let first = validator.parse(&input).unwrap();
    let second = validator.parse(&input).unwrap();

    assert_eq!(first, second);
}

#[test]
fn filter_failure_names_field() {
    let validator = Validator::default();
    validator
        .add(
            CliOption::new("count")
                .alias("c")
                .filter(IntegerFilter::new()),
        )
        .unwrap();

    let error = validator.parse_args(&["--c", "x"]).unwrap_err();

    assert_matches!(
        error,
        Error::Validation(ValidationError::Filter { ref field, .. }) if field == "count"
    );
    assert_eq!(
        error.to_string(),
        "Validation error: count: 'x' is not an integer."
    );
}

#[test]
fn path_argument() {
    let directory = tempfile::tempdir().unwrap();
    let present = directory.path().join("present.txt");
    std::fs::write(&present, "content").unwrap();
    let missing = directory.path().join("missing.txt");

    let validator = Validator::default();
    validator
        .add(
            CliArgument::new("inputs", 0)
                .filter(PathFilter::new().existence(Existence::MustExist))
                .variadic(),
        )
        .unwrap();

    let present = present.to_string_lossy().to_string();
    let validated = validator.parse_args(&[present.as_str()]).unwrap();
    assert_matches!(validated.value("inputs"), Some(Value::List(paths)) if paths.len() == 1);

    let missing = missing.to_string_lossy().to_string();
    assert_matches!(
        validator.parse_args(&[present.as_str(), missing.as_str()]),
        Err(Error::Validation(ValidationError::Filter { ref field, .. })) if field == "inputs"
    );
}

#[test]
fn declarative_load() {
    let config = Node::new("config")
        .child(Node::new("flag").attribute("name", "dry-run").attribute("alias", "n"))
        .child(
            Node::new("option")
                .attribute("name", "level")
                .attribute("default", "low")
                .child(
                    Node::new("set")
                        .attribute("values", "low, high")
                        .attribute("case-sensitive", "false"),
                ),
        )
        .child(
            Node::new("argument")
                .attribute("name", "count")
                .attribute("index", "0")
                .attribute("required", "true")
                .child(Node::new("integer").attribute("min", "1")),
        )
        .child(Node::new("only-known-flags"));
    let validator = Validator::default();
    Factories::with_builtins().load(&validator, &config).unwrap();

    let validated = validator.parse_args(&["-n", "--level", "HIGH", "3"]).unwrap();
    assert!(validated.flag("dry-run"));
    assert_eq!(validated.value("level"), Some(&Value::from("high")));
    assert_eq!(validated.value("count"), Some(&Value::Integer(3)));

    let validated = validator.parse_args(&["1"]).unwrap();
    assert!(!validated.flag("dry-run"));
    assert_eq!(validated.value("level"), Some(&Value::from("low")));

    assert_matches!(
        validator.parse_args(&["-x", "1"]),
        Err(Error::Validation(ValidationError::Rule(_)))
    );
}

#[test]
fn declarative_rule_needs_declared_fields() {
    let config = Node::new("config")
        .child(Node::new("flag").attribute("name", "a"))
        .child(Node::new("required").field("a").field("b"));
    let validator = Validator::default();

    assert_eq!(
        Factories::with_builtins().load(&validator, &config),
        Err(ConfigError::UnknownField("b".to_string()))
    );
}
