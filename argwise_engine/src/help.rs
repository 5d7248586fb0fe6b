use terminal_size::{terminal_size, Width};

use crate::api::{CliArgument, CliFlag, CliOption};
use crate::model::Environment;
use crate::validator::Validator;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Where help output goes.
pub trait UserInterface {
    /// Output one line.
    fn print(&self, message: String);
}

/// Prints to stdout.
#[derive(Debug, Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }
}

// We'll target 95% of the total width, to ensure the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;
// Enough for 3 average (5 character) words, separated by spaces.
const MINIMUM_MIDDLE_WIDTH: usize = 17;
const FALLBACK_TOTAL_WIDTH: usize = 80;
const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

/// Renders help text from a validator's declarations.
///
/// The printer only reads the declarations; it never changes the validator.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::{CliFlag, Printer, Validator};
///
/// let validator = Validator::default();
/// validator.add(CliFlag::new("verbose").help("Print more.")).unwrap();
///
/// let lines = Printer::new("demo", Some(80)).render(&validator);
/// assert_eq!(lines[0], "usage: demo [-verbose]");
/// assert_eq!(lines[3], " -verbose   Print more.");
/// ```
#[derive(Debug, Clone)]
pub struct Printer {
    program: String,
    terminal_width: Option<usize>,
}

impl Printer {
    /// A printer wrapping to `terminal_width` (or a fixed width when `None`).
    pub fn new(program: impl Into<String>, terminal_width: Option<usize>) -> Self {
        Self {
            program: program.into(),
            terminal_width,
        }
    }

    /// A printer wrapping to the width of the current terminal, if there is one.
    pub fn terminal(program: impl Into<String>) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(program, terminal_width)
    }

    /// Render the help text and send it to `user_interface`, line by line.
    pub fn print_help(&self, validator: &Validator, user_interface: &(impl UserInterface + ?Sized)) {
        for line in self.render(validator) {
            user_interface.print(line);
        }
    }

    /// Render the help text as lines.
    pub fn render(&self, validator: &Validator) -> Vec<String> {
        let environment = validator.environment();
        let mut flags = validator.flags();
        flags.sort_by(|a, b| a.id().cmp(b.id()));
        let mut options = validator.options();
        options.sort_by(|a, b| a.id().cmp(b.id()));
        let arguments = validator.arguments();
        let rules = validator.rules();

        let mut summary = Vec::default();
        let mut sections: Vec<(&str, Vec<(String, String)>)> = Vec::default();

        summary.extend(
            flags
                .iter()
                .map(|flag| format!("[{}{}]", environment.flag_marker(), flag.id())),
        );
        summary.extend(options.iter().map(|option| option_usage(environment, option)));
        summary.extend(arguments.iter().map(argument_usage));

        if !arguments.is_empty() {
            let rows = arguments
                .iter()
                .map(|argument| (argument_grammar(argument), argument_text(argument)))
                .collect();
            sections.push(("arguments:", rows));
        }

        if !flags.is_empty() {
            let rows = flags
                .iter()
                .map(|flag| {
                    (
                        flag_grammar(environment, flag),
                        flag.description().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            sections.push(("flags:", rows));
        }

        if !options.is_empty() {
            let rows = options
                .iter()
                .map(|option| (option_grammar(environment, option), option_text(option)))
                .collect();
            sections.push(("options:", rows));
        }

        let left_width = sections
            .iter()
            .flat_map(|(_, rows)| rows.iter().map(|(left, _)| width(left)))
            .max()
            .unwrap_or(0);
        let total_width = self.terminal_width.unwrap_or(FALLBACK_TOTAL_WIDTH);
        let middle_width = middle_width(left_width, total_width);

        let mut out = vec![format!("usage: {} {}", self.program, summary.join(" "))
            .trim_end()
            .to_string()];

        for (title, rows) in sections {
            out.push(String::default());
            out.push(title.to_string());

            for (left, middle) in rows {
                out.extend(render_row(left_width, middle_width, &left, &middle));
            }
        }

        if !rules.is_empty() {
            out.push(String::default());
            out.push("rules:".to_string());
            let rule_width = std::cmp::max(
                total_width.saturating_sub(MAIN_INDENT),
                MINIMUM_MIDDLE_WIDTH,
            );

            for rule in &rules {
                out.extend(
                    chunk(&rule.describe(), rule_width)
                        .into_iter()
                        .map(|line| format!("{:MAIN_INDENT$}{line}", "")),
                );
            }
        }

        out
    }
}

fn flag_grammar(environment: &Environment, flag: &CliFlag) -> String {
    flag.names()
        .iter()
        .map(|name| format!("{}{name}", environment.flag_marker()))
        .collect::<Vec<String>>()
        .join(", ")
}

fn metavar(id: &str) -> String {
    id.to_uppercase()
}

fn option_grammar(environment: &Environment, option: &CliOption) -> String {
    let names = option
        .names()
        .iter()
        .map(|name| format!("{}{name}", environment.option_marker()))
        .collect::<Vec<String>>()
        .join(", ");
    format!("{names} {}", metavar(option.id()))
}

fn option_usage(environment: &Environment, option: &CliOption) -> String {
    let mut usage = format!(
        "{}{} {}",
        environment.option_marker(),
        option.id(),
        metavar(option.id())
    );

    if option.allows_multiple() {
        usage.push_str(" ...");
    }

    if option.is_required() {
        usage
    } else {
        format!("[{usage}]")
    }
}

fn argument_grammar(argument: &CliArgument) -> String {
    if argument.is_variadic() {
        format!("{} ...", metavar(argument.id()))
    } else {
        metavar(argument.id())
    }
}

fn argument_usage(argument: &CliArgument) -> String {
    if argument.is_required() {
        argument_grammar(argument)
    } else {
        format!("[{}]", argument_grammar(argument))
    }
}

fn option_text(option: &CliOption) -> String {
    let mut parts = Vec::default();
    parts.extend(option.description().map(str::to_string));
    parts.extend(option.value_filter().map(|filter| format!("[{}]", filter.describe())));
    parts.extend(option.initial().map(|value| format!("(default: {value})")));

    if option.is_required() {
        parts.push("(required)".to_string());
    }

    parts.join(" ")
}

fn argument_text(argument: &CliArgument) -> String {
    let mut parts = Vec::default();
    parts.extend(argument.description().map(str::to_string));
    parts.extend(
        argument
            .value_filter()
            .map(|filter| format!("[{}]", filter.describe())),
    );
    parts.extend(argument.initial().map(|value| format!("(default: {value})")));
    parts.join(" ")
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn middle_width(left_width: usize, total_width: usize) -> usize {
    let non_middle = MAIN_INDENT + left_width + PADDING_WIDTH;
    let target_total_width = (total_width as f64 * TARGET_TOTAL_FACTOR) as usize;

    if non_middle + MINIMUM_MIDDLE_WIDTH <= target_total_width {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Columns {non_middle} fit within the target total {target_total_width}.  Selecting middle: {}.", target_total_width - non_middle);
        }

        target_total_width - non_middle
    } else {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Columns {non_middle} do not fit within the target total {target_total_width}.  Selecting middle: {MINIMUM_MIDDLE_WIDTH}.");
        }

        MINIMUM_MIDDLE_WIDTH
    }
}

fn render_row(left_width: usize, middle_width: usize, left: &str, middle: &str) -> Vec<String> {
    let padding = format!("{:PADDING_WIDTH$}", "");
    let parts = chunk(middle, middle_width);

    if parts.is_empty() {
        return vec![format!("{:MAIN_INDENT$}{left}", "")];
    }

    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let left = if i == 0 { left } else { "" };
            format!("{:MAIN_INDENT$}{left:left_width$}{padding}{part}", "")
        })
        .collect()
}

/// Break `paragraph` into lines of at most `width` characters, hyphenating words that do not fit on a line.
fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if self::width(&current) + self::width(word) + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let mut rest = characters.as_slice();

    while rest.len() > width {
        let (head, tail) = rest.split_at(width - 1);
        lines.push(format!("{}-", head.iter().collect::<String>()));
        rest = tail;
    }

    current.extend(rest);
}
