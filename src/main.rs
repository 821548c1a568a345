use clap::{CommandFactory, Parser};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use avlkit::cli::args::Cli;
use avlkit::cli::commands::execute_command;
use avlkit::cli::output;
use avlkit::exitcode;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if cli.command.is_none() {
        Cli::command().print_help().ok();
        std::process::exit(exitcode::USAGE);
    }

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
    std::process::exit(exitcode::OK);
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avlkit::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        testing::init_test_setup();
        Cli::command().debug_assert();
    }

    #[test]
    fn given_tree_command_when_parsing_then_collects_keys_and_removals() {
        let cli = Cli::try_parse_from(["avlkit", "tree", "3", "1", "-2", "--remove", "1", "--remove-upper", "2"])
            .expect("parse");
        match cli.command {
            Some(avlkit::cli::Commands::Tree {
                keys,
                remove,
                remove_upper,
            }) => {
                assert_eq!(keys, vec![3, 1, -2]);
                assert_eq!(remove, vec![1]);
                assert_eq!(remove_upper, Some(2));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
