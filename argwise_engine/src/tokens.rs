mod lexer;

pub use lexer::split_line;

use crate::error::ParseError;
use crate::model::{Environment, Input};
use crate::validator::Registry;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// When this is the very first token, every token after it is positional.
pub const END_OF_OPTIONS: &str = ":";

#[derive(Debug, PartialEq, Eq)]
enum Class<'t> {
    Flag(&'t str),
    Option(&'t str),
    Positional,
}

fn classify<'t>(
    token: &'t str,
    environment: &Environment,
    registry: Option<&dyn Registry>,
) -> Result<Class<'t>, ParseError> {
    if environment.is_ambiguous() {
        // Flags and options look the same; only the declarations can tell them apart.
        return match bare(token, environment.flag_marker()) {
            Some("") | None => Ok(Class::Positional),
            Some(name) => {
                let registry =
                    registry.ok_or_else(|| ParseError::RegistryRequired(token.to_string()))?;

                if registry.knows_option(name) {
                    Ok(Class::Option(name))
                } else {
                    Ok(Class::Flag(name))
                }
            }
        };
    }

    // The longer marker goes first, so that '--' is not mistaken for '-'.
    let option_first =
        environment.option_marker().len() >= environment.flag_marker().len();
    let option = bare(token, environment.option_marker());
    let flag = bare(token, environment.flag_marker());
    let ordered = if option_first {
        [option.map(Class::Option), flag.map(Class::Flag)]
    } else {
        [flag.map(Class::Flag), option.map(Class::Option)]
    };

    Ok(match ordered.into_iter().flatten().next() {
        // A bare marker (ex: '-' or '--') names nothing.
        Some(Class::Flag("")) | Some(Class::Option("")) | None => Class::Positional,
        Some(class) => class,
    })
}

fn bare<'t>(token: &'t str, marker: &str) -> Option<&'t str> {
    token.strip_prefix(marker)
}

/// Classify pre-split tokens into flags, option values and positional arguments.
///
/// * An option consumes the following token as its value.
/// If there is no following token, it is accepted as a flag of the same name when the registry knows such a flag.
/// * The first positional token ends option parsing: every later token is positional.
/// * A leading [`END_OF_OPTIONS`] token starts positional parsing straight away (and is dropped).
///
/// A `registry` is required when the environment's flag and option markers are identical.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::{tokenize, Environment};
///
/// let input = tokenize(&["-v", "--name", "Bob", "hi", "-x"], &Environment::unix(), None).unwrap();
/// assert!(input.has_flag("v"));
/// assert_eq!(input.option_values("name"), &["Bob".to_string()]);
/// assert_eq!(input.arguments(), &["hi".to_string(), "-x".to_string()]);
/// ```
pub fn tokenize<S: AsRef<str>>(
    tokens: &[S],
    environment: &Environment,
    registry: Option<&dyn Registry>,
) -> Result<Input, ParseError> {
    let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    let mut input = Input::default();
    let mut positional = false;
    let mut index = 0;

    if tokens.first() == Some(&END_OF_OPTIONS) {
        positional = true;
        index = 1;
    }

    while index < tokens.len() {
        let token = tokens[index];
        index += 1;

        if positional {
            input.push_argument(token);
            continue;
        }

        let class = classify(token, environment, registry)?;
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Token '{token}' classified as {class:?}.");
        }

        match class {
            Class::Flag(name) => input.push_flag(name),
            Class::Option(name) => match tokens.get(index) {
                Some(value) => {
                    input.push_option(name, *value);
                    index += 1;
                }
                None => {
                    if registry.is_some_and(|registry| registry.knows_flag(name)) {
                        input.push_flag(name);
                    } else {
                        return Err(ParseError::MissingValue(name.to_string()));
                    }
                }
            },
            Class::Positional => {
                positional = true;
                input.push_argument(token);
            }
        }
    }

    Ok(input)
}

/// Split `line` (honouring quotes and the environment's escape character) and [`tokenize`] it.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::{tokenize_line, Environment};
///
/// let input = tokenize_line(r#"-v --msg "hello world" arg1"#, &Environment::unix(), None).unwrap();
/// assert!(input.has_flag("v"));
/// assert_eq!(input.option_values("msg"), &["hello world".to_string()]);
/// assert_eq!(input.arguments(), &["arg1".to_string()]);
/// ```
pub fn tokenize_line(
    line: &str,
    environment: &Environment,
    registry: Option<&dyn Registry>,
) -> Result<Input, ParseError> {
    let tokens = split_line(line, environment.escape())?;
    tokenize(&tokens, environment, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::FieldKind;
    use rstest::rstest;

    /// Knows the option `out` and the flag `verbose`.
    struct Known;

    impl Registry for Known {
        fn lookup(&self, name: &str) -> Option<(FieldKind, &str)> {
            match name {
                "out" => Some((FieldKind::Option, "out")),
                "verbose" => Some((FieldKind::Flag, "verbose")),
                _ => None,
            }
        }
    }

    fn same_markers() -> Environment {
        Environment::new("-", "-", '\\').unwrap()
    }

    #[rstest]
    #[case("-v", Class::Flag("v"))]
    #[case("--verbose", Class::Option("verbose"))]
    #[case("---x", Class::Option("-x"))]
    #[case("value", Class::Positional)]
    #[case("-", Class::Positional)]
    #[case("--", Class::Positional)]
    fn classify_unix(#[case] token: &str, #[case] expected: Class) {
        assert_eq!(
            classify(token, &Environment::unix(), None).unwrap(),
            expected
        );
    }

    #[rstest]
    #[case("+x", Class::Option("x"))]
    #[case("++x", Class::Flag("x"))]
    #[case("+x+", Class::Option("x+"))]
    #[case("+", Class::Positional)]
    #[case("++", Class::Positional)]
    fn classify_longer_flag_marker(#[case] token: &str, #[case] expected: Class) {
        let environment = Environment::new("++", "+", '\\').unwrap();
        assert_eq!(classify(token, &environment, None).unwrap(), expected);
    }

    #[rstest]
    #[case("-out", Class::Option("out"))]
    #[case("-verbose", Class::Flag("verbose"))]
    #[case("-unknown", Class::Flag("unknown"))]
    #[case("out", Class::Positional)]
    fn classify_same_markers(#[case] token: &str, #[case] expected: Class) {
        assert_eq!(
            classify(token, &same_markers(), Some(&Known)).unwrap(),
            expected
        );
    }

    #[test]
    fn same_markers_without_registry() {
        assert_eq!(
            tokenize(&["-out", "file.txt"], &same_markers(), None).unwrap_err(),
            ParseError::RegistryRequired("-out".to_string())
        );
        // Purely positional input never needs the registry.
        assert!(tokenize(&["a", "-b"], &same_markers(), None).is_ok());
    }

    #[test]
    fn same_markers_fallback() {
        let input = tokenize(&["-out", "file.txt"], &same_markers(), Some(&Known)).unwrap();
        assert_eq!(input.option_values("out"), &["file.txt".to_string()]);
        assert!(input.flags().is_empty());

        let input = tokenize(&["-verbose"], &same_markers(), Some(&Known)).unwrap();
        assert!(input.has_flag("verbose"));
        assert!(input.options().is_empty());
    }

    #[test]
    fn dos_environment() {
        let input = tokenize(
            &["/verbose", "/out", "c:\\x.txt", "a"],
            &Environment::dos(),
            Some(&Known),
        )
        .unwrap();
        assert!(input.has_flag("verbose"));
        assert_eq!(input.option_values("out"), &["c:\\x.txt".to_string()]);
        assert_eq!(input.arguments(), &["a".to_string()]);
    }

    #[test]
    fn option_consumes_next_unconditionally() {
        let input = tokenize(&["--out", "-v", "--x", "--y"], &Environment::unix(), None).unwrap();
        assert_eq!(input.option_values("out"), &["-v".to_string()]);
        assert_eq!(input.option_values("x"), &["--y".to_string()]);
        assert!(input.flags().is_empty());
    }

    #[test]
    fn trailing_option() {
        assert_eq!(
            tokenize(&["--out"], &Environment::unix(), None).unwrap_err(),
            ParseError::MissingValue("out".to_string())
        );
        assert_eq!(
            tokenize(&["--out"], &Environment::unix(), Some(&Known)).unwrap_err(),
            ParseError::MissingValue("out".to_string())
        );

        // A trailing option that is really a known flag.
        let input = tokenize(&["--verbose"], &Environment::unix(), Some(&Known)).unwrap();
        assert!(input.has_flag("verbose"));
    }

    #[test]
    fn repeated_options_accumulate() {
        let input = tokenize(
            &["--opt", "a", "--opt", "b", "-v", "-v"],
            &Environment::unix(),
            None,
        )
        .unwrap();
        assert_eq!(
            input.option_values("opt"),
            &["a".to_string(), "b".to_string()]
        );
        assert_eq!(input.flags().len(), 1);
    }

    #[rstest]
    #[case(vec!["a", "-v", "--out", "x"], vec!["a", "-v", "--out", "x"])]
    #[case(vec![":", "-v", "b"], vec!["-v", "b"])]
    #[case(vec![":"], vec![])]
    #[case(vec!["-v", ":", "-w"], vec![":", "-w"])]
    fn positional_mode(#[case] tokens: Vec<&str>, #[case] expected: Vec<&str>) {
        let input = tokenize(&tokens, &Environment::unix(), None).unwrap();
        assert_eq!(input.arguments(), expected.as_slice());
    }

    #[test]
    fn empty() {
        let tokens: &[&str] = &[];
        let input = tokenize(tokens, &Environment::unix(), None).unwrap();
        assert_eq!(input, Input::default());
    }

    #[test]
    fn line() {
        let input =
            tokenize_line(r#"-v --msg "hello world" arg1"#, &Environment::unix(), None).unwrap();
        assert!(input.has_flag("v"));
        assert_eq!(input.option_values("msg"), &["hello world".to_string()]);
        assert_eq!(input.arguments(), &["arg1".to_string()]);
    }

    #[test]
    fn line_unterminated() {
        assert_eq!(
            tokenize_line(r#"--msg "unterminated"#, &Environment::unix(), None).unwrap_err(),
            ParseError::UnterminatedQuote(6)
        );
    }

    #[test]
    fn line_escape_from_environment() {
        let input = tokenize_line("/out a^ b", &Environment::dos(), Some(&Known)).unwrap();
        assert_eq!(input.option_values("out"), &["a b".to_string()]);
    }
}
