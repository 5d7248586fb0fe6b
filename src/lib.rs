//! `argwise` is a declarative command line parser and validator for Rust.
//!
//! Declare the flags, options and positional arguments of your program on a [`Validator`], attach value filters and cross-field rules, then parse.
//! The result is a [`ValidatedInput`]: a typed map keyed by each field's primary identifier.
//! `argwise` attempts to prioritize the following design concerns:
//! * *Configurable token conventions*:
//! The markers that introduce flags and options are part of an [`Environment`], not hard coded.
//! Unix style (`-flag --option value`) and DOS style (`/flag /option value`) come built in.
//! * *Validation, not just parsing*:
//! Values are converted and range/pattern/path checked by [filters](#value-filters).
//! Relationships between fields are checked by [rules](#rules).
//! * *Fail fast*:
//! A parse stops at the first problem, and the error names the offending field by its primary identifier.
//! * *Declarative configuration*:
//! Declarations may be built in code, or from configuration nodes via a name to factory registry ([`Factories`]).
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/greet.rs")]
//! ```
//!
//! ```console
//! $ greet -h
//! usage: greet [-help] [-loud] [--name NAME] [--times TIMES] [GREETING]
//!
//! arguments:
//!  GREETING           The greeting to use. (default: Hello)
//!
//! flags:
//!  -help, -h          Show this help message and exit.
//!  -loud, -l          Shout the greeting.
//!
//! options:
//!  --name, --n NAME   Who to greet. (default: world)
//!  --times TIMES      How often to greet. [integer in [1, 10]] (default: 1)
//!
//! $ greet --name Bob Hi
//! Hi, Bob!
//!
//! $ greet --times 11
//! Validation error: times: '11' is not within [1, 10].
//! ```
//!
//! # Tokens
//! Each token is classified as a flag, an option (which consumes the next token as its value) or a positional argument.
//! * When the markers differ, the longer marker is tested first (so `--name` is an option under the unix environment, and `-v` a flag).
//! * When the markers are identical (ex: [`Environment::dos`]), the declarations decide: a known option name is an option, anything else is a flag.
//! * The first positional token ends option parsing; every later token is positional.
//! A leading [`END_OF_OPTIONS`] token (`:`) starts positional parsing immediately.
//! * A single argument line is split on whitespace, honouring double quotes and the environment's escape character ([`split_line`]).
//!
//! ```
//! use argwise::{CliOption, Environment, Validator, Value};
//!
//! let validator = Validator::new(Environment::dos());
//! validator.add(CliOption::new("out")).unwrap();
//!
//! let validated = validator.parse_line(r#"/out "my file.txt" /verbose"#).unwrap();
//! assert_eq!(validated.value("out"), Some(&Value::from("my file.txt")));
//! assert!(validated.flag("verbose"));
//! ```
//!
//! # Resolution
//! [`Validator::parse`] resolves the tokenized input in a fixed order:
//! 1. Declared flags (`true` when present under any of their names), then undeclared flags (always `true`).
//! 2. Declared options: required/multiplicity checks, the filter over every value, or the default when absent.
//! Undeclared options pass through as lists of raw text.
//! 3. Arguments, by ascending index: the variadic argument (which must hold the highest index) takes every remaining token.
//! 4. Rules, in registration order.
//!
//! ```
//! use argwise::{CliArgument, CliOption, IntegerFilter, Validator, Value};
//!
//! let validator = Validator::default();
//! validator
//!     .add(CliOption::new("tag").alias("t").multiple())
//!     .unwrap();
//! validator
//!     .add(CliArgument::new("numbers", 0).filter(IntegerFilter::new()).variadic())
//!     .unwrap();
//!
//! let validated = validator.parse_args(&["--t", "a", "--tag", "b", "1", "2"]).unwrap();
//! assert_eq!(validated.value("tag").and_then(Value::as_list).map(|tags| tags.len()), Some(2));
//! assert_eq!(
//!     validated.value("numbers"),
//!     Some(&Value::List(vec![Value::Integer(1), Value::Integer(2)]))
//! );
//! ```
//!
//! # Value filters
//! A filter converts a raw string into a typed [`Value`], or rejects it with a reason.
//! * [`IntegerFilter`], [`BigIntegerFilter`]: inclusive bounds and a radix.
//! * [`DecimalFilter`], [`BigDecimalFilter`]: inclusive bounds.
//! * [`RegexFilter`]: the whole value must match; yields the configured capture group.
//! * [`SetFilter`]: membership, case sensitive or not; always yields the configured (canonical) string.
//! * [`PathFilter`]: existence, type, access and extension checks, or a custom predicate.
//!
//! Implement [`prelude::ValueFilter`] for your own filters.
//!
//! # Rules
//! Rules run once every field is resolved.
//! [`And`], [`Or`], [`Xor`] and [`Not`] combine other rules; [`RequiredFields`] and [`ExactlyOneOf`] check named fields;
//! [`OnlyKnownFlags`] and [`OnlyKnownOptions`] reject undeclared input.
//! Each may carry a custom message.
//!
//! ```
//! use argwise::{CliFlag, Error, ExactlyOneOf, Validator};
//!
//! let validator = Validator::default();
//! validator.add(CliFlag::new("json")).unwrap();
//! validator.add(CliFlag::new("yaml")).unwrap();
//! validator
//!     .add(ExactlyOneOf::new(["json", "yaml"]).message("Pick one output format."))
//!     .unwrap();
//!
//! assert!(validator.parse_args(&["-yaml"]).is_ok());
//! assert!(matches!(validator.parse_args(&["-json", "-yaml"]), Err(Error::Validation(_))));
//! ```
//!
//! # Declarative configuration
//! [`Factories`] maps type names to factories building filters and rules from [`Node`]s.
//! [`Factories::load`] declares a whole configuration tree; rules may only reference fields declared before them.
//!
//! ```no_run
#![doc = include_str!("../demos/declared.rs")]
//! ```
//!
//! # Errors
//! Every failure is an [`Error`]: a [`ParseError`] (malformed raw input), a [`ValidationError`] (a declared constraint was not met) or a [`ConfigError`] (inconsistent declarations).
//! Registration errors are returned from [`Validator::add`] directly.
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events for token classification, registration and each resolution phase.
pub use argwise_engine::*;
