mod registry;
mod resolve;

pub use registry::{FieldKind, Registry};

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::{CliArgument, CliFlag, CliOption, Declaration};
use crate::error::{ConfigError, Error, ParseError, ValidationError};
use crate::model::{Environment, Input, ValidatedInput};
use crate::rule::SharedRule;
use crate::tokens::{tokenize, tokenize_line};
use registry::Declarations;

/// The registry of declared flags, options, arguments and rules, and the parse orchestrator.
///
/// Registration (`add`/`reset`) takes an exclusive lock.
/// Parsing only reads the registry, so a fully configured validator may be shared across threads and parse concurrently.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::{CliArgument, CliFlag, CliOption, Validator, Value};
///
/// let validator = Validator::default();
/// validator.add(CliFlag::new("v")).unwrap();
/// validator.add(CliOption::new("name").default_text("world")).unwrap();
/// validator.add(CliArgument::new("greeting", 0).required()).unwrap();
///
/// let validated = validator.parse_args(&["--name", "Bob", "hi"]).unwrap();
/// assert!(!validated.flag("v"));
/// assert_eq!(validated.value("name"), Some(&Value::from("Bob")));
/// assert_eq!(validated.value("greeting"), Some(&Value::from("hi")));
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    environment: Environment,
    declarations: RwLock<Declarations>,
}

impl Validator {
    /// An empty validator for `environment`.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            declarations: RwLock::default(),
        }
    }

    /// The environment used to tokenize.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Register a flag, option, argument or rule.
    ///
    /// Fails, leaving the registry untouched, when a name is empty or already taken, an argument index is taken,
    /// or the variadic argument would not hold the highest index.
    pub fn add(&self, declaration: impl Into<Declaration>) -> Result<(), ConfigError> {
        self.write().add(declaration.into())
    }

    /// Remove every declaration.
    pub fn reset(&self) {
        self.write().reset();
    }

    /// The declared flags, in registration order.
    pub fn flags(&self) -> Vec<CliFlag> {
        self.read().flags.clone()
    }

    /// The declared options, in registration order.
    pub fn options(&self) -> Vec<CliOption> {
        self.read().options.clone()
    }

    /// The declared arguments, in index order.
    pub fn arguments(&self) -> Vec<CliArgument> {
        self.read().arguments.clone()
    }

    /// The declared rules, in registration order.
    pub fn rules(&self) -> Vec<SharedRule> {
        self.read().rules.clone()
    }

    /// What `name` (any of a field's names) refers to, if anything.
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.read().lookup(name).map(|(kind, _)| kind)
    }

    /// Whether `name` is a name of a declared flag.
    pub fn knows_flag(&self, name: &str) -> bool {
        self.read().knows_flag(name)
    }

    /// Whether `name` is a name of a declared option.
    pub fn knows_option(&self, name: &str) -> bool {
        self.read().knows_option(name)
    }

    /// Whether `name` is a declared argument.
    pub fn knows_argument(&self, name: &str) -> bool {
        self.read().knows_argument(name)
    }

    /// Tokenize `tokens` under this validator's environment, consulting its declarations.
    pub fn tokenize<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Input, ParseError> {
        tokenize(tokens, &self.environment, Some(&*self.read()))
    }

    /// Split and tokenize `line` under this validator's environment, consulting its declarations.
    pub fn tokenize_line(&self, line: &str) -> Result<Input, ParseError> {
        tokenize_line(line, &self.environment, Some(&*self.read()))
    }

    /// Resolve `input` against the declarations, then run the rules.
    ///
    /// Stops at the first failure.
    pub fn parse(&self, input: &Input) -> Result<ValidatedInput, ValidationError> {
        resolve::resolve(&self.read(), input)
    }

    /// Tokenize and [`Validator::parse`] pre-split arguments (excluding the program name).
    pub fn parse_args<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ValidatedInput, Error> {
        let declarations = self.read();
        let input = tokenize(tokens, &self.environment, Some(&*declarations))?;
        Ok(resolve::resolve(&declarations, &input)?)
    }

    /// Tokenize and [`Validator::parse`] a single argument line.
    ///
    /// ### Example
    /// ```
    /// # use argwise_engine as argwise;
    /// use argwise::{CliFlag, CliOption, Validator, Value};
    ///
    /// let validator = Validator::default();
    /// validator.add(CliFlag::new("v")).unwrap();
    /// validator.add(CliOption::new("msg")).unwrap();
    ///
    /// let validated = validator.parse_line(r#"-v --msg "hello world""#).unwrap();
    /// assert!(validated.flag("v"));
    /// assert_eq!(validated.value("msg"), Some(&Value::from("hello world")));
    /// ```
    pub fn parse_line(&self, line: &str) -> Result<ValidatedInput, Error> {
        let declarations = self.read();
        let input = tokenize_line(line, &self.environment, Some(&*declarations))?;
        Ok(resolve::resolve(&declarations, &input)?)
    }

    /// Parse the arguments of the current process (skipping the program name).
    pub fn parse_env(&self) -> Result<ValidatedInput, Error> {
        let tokens: Vec<String> = std::env::args().skip(1).collect();
        self.parse_args(&tokens)
    }

    fn read(&self) -> RwLockReadGuard<'_, Declarations> {
        self.declarations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Declarations> {
        self.declarations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
