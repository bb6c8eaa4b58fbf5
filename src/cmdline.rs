use clap::{command, value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

pub fn register_args() -> Command {
    command!() // requires `cargo` feature
        .next_line_help(true)
        .arg(
            Arg::new("input")
                .required(false)
                .long("input")
                .env("SORTER_INPUT")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .default_value("IntegerNumbersToBeSorted.txt")
                .help("Text file of whitespace separated integers to sort"),
        )
        .arg(
            Arg::new("extension")
                .required(false)
                .long("extension")
                .env("SORTER_EXTENSION")
                .action(ArgAction::Set)
                .default_value("txt")
                .help("Extension the input file name must end with (case-sensitive)"),
        )
        .arg(
            Arg::new("count")
                .required(false)
                .long("count")
                .env("SORTER_COUNT")
                .action(ArgAction::Set)
                .value_parser(value_parser!(usize))
                .default_value("200")
                .help("How many random numbers to generate"),
        )
        .arg(
            Arg::new("max-value")
                .required(false)
                .long("max-value")
                .env("SORTER_MAX_VALUE")
                .action(ArgAction::Set)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .default_value("3000")
                .help("Inclusive upper bound of the generated numbers. The lower bound is 1"),
        )
        .arg(
            Arg::new("on-malformed")
                .required(false)
                .long("on-malformed")
                .env("SORTER_ON_MALFORMED")
                .action(ArgAction::Set)
                .value_parser(["stop", "skip"])
                .default_value("stop")
                .help(concat!(
                    "What to do with a token that is not an integer. ",
                    "stop keeps the numbers read so far and ignores the rest of the file, ",
                    "skip ignores only the offending token",
                )),
        )
        .arg(
            Arg::new("show-file-values")
                .required(false)
                .long("show-file-values")
                .env("SORTER_SHOW_FILE_VALUES")
                .action(ArgAction::SetTrue)
                .help("Also print the numbers read from the file, in file order"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more. -v logs every number read, -vv every number generated"),
        )
}
