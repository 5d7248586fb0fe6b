use std::io::BufRead;

use argwise::{CliArgument, CliFlag, CliOption, Environment, ExactlyOneOf, Validator};

fn main() {
    let validator = Validator::new(Environment::dos());
    validator.add(CliFlag::new("upper")).expect("valid declaration");
    validator.add(CliFlag::new("lower")).expect("valid declaration");
    validator
        .add(CliOption::new("prefix").default_text("> "))
        .expect("valid declaration");
    validator
        .add(CliArgument::new("words", 0).variadic().required())
        .expect("valid declaration");
    validator
        .add(ExactlyOneOf::new(["upper", "lower"]).message("Pick one of /upper or /lower."))
        .expect("valid declaration");

    // One command per line, ex: `/upper /prefix "* " hello world`
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                eprintln!("{error}");
                break;
            }
        };

        match validator.parse_line(&line) {
            Ok(validated) => {
                let prefix = validated
                    .value("prefix")
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let words = validated
                    .value("words")
                    .and_then(|value| value.as_list())
                    .map(|words| {
                        words
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<String>>()
                            .join(" ")
                    })
                    .unwrap_or_default();

                if validated.flag("upper") {
                    println!("{prefix}{}", words.to_uppercase());
                } else {
                    println!("{prefix}{}", words.to_lowercase());
                }
            }
            Err(error) => eprintln!("{error}"),
        }
    }
}
