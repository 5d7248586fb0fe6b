use argwise::{
    CliArgument, CliFlag, CliOption, ConsoleInterface, IntegerFilter, Printer, Validator,
};

fn main() {
    let validator = Validator::default();
    validator
        .add(CliFlag::new("help").alias("h").help("Show this help message and exit."))
        .expect("valid declaration");
    validator
        .add(CliFlag::new("loud").alias("l").help("Shout the greeting."))
        .expect("valid declaration");
    validator
        .add(
            CliOption::new("name")
                .alias("n")
                .default_text("world")
                .help("Who to greet."),
        )
        .expect("valid declaration");
    validator
        .add(
            CliOption::new("times")
                .filter(IntegerFilter::new().min(1).max(10))
                .default_text("1")
                .help("How often to greet."),
        )
        .expect("valid declaration");
    validator
        .add(
            CliArgument::new("greeting", 0)
                .default_text("Hello")
                .help("The greeting to use."),
        )
        .expect("valid declaration");

    let validated = match validator.parse_env() {
        Ok(validated) => validated,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    if validated.flag("help") {
        Printer::terminal("greet").print_help(&validator, &ConsoleInterface::default());
        return;
    }

    let greeting = validated
        .value("greeting")
        .map(ToString::to_string)
        .unwrap_or_default();
    let name = validated
        .value("name")
        .map(ToString::to_string)
        .unwrap_or_default();
    let times = validated
        .value("times")
        .and_then(|value| value.as_i64())
        .unwrap_or(1);
    let mut line = format!("{greeting}, {name}!");

    if validated.flag("loud") {
        line = line.to_uppercase();
    }

    for _ in 0..times {
        println!("{line}");
    }
}
